use progress_core::model::Lesson;

/// One editable lesson row in the course view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub index: usize,
    pub name_label: String,
    pub name: String,
    pub completed: bool,
    pub needs_revision: bool,
    pub what_learned: String,
}

#[must_use]
pub fn map_lesson_rows(lessons: &[Lesson]) -> Vec<LessonRowVm> {
    lessons
        .iter()
        .enumerate()
        .map(|(index, lesson)| LessonRowVm {
            index,
            name_label: format!("Lesson {} Name", index + 1),
            name: lesson.name().to_owned(),
            completed: lesson.completed(),
            needs_revision: lesson.needs_revision(),
            what_learned: lesson.what_learned().to_owned(),
        })
        .collect()
}
