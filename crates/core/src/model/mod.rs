mod catalog;
mod lesson;

pub use catalog::{Catalog, CourseError, NewCourse, NewCourseError, STREAK_MARK};
pub use lesson::{Lesson, LessonEdit, LessonError, lessons_from_lines};
