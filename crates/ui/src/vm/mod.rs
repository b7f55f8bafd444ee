mod course_vm;
mod lesson_vm;
mod progress_vm;

pub use course_vm::{CourseOptionVm, map_course_options};
pub use lesson_vm::{LessonRowVm, map_lesson_rows};
pub use progress_vm::{PIE_CENTER, PIE_RADIUS, PieSliceVm, ProgressVm};
