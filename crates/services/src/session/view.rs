use progress_core::model::{Catalog, Lesson};

/// Whether an action changed what the user should see.
///
/// The UI redraws on `Changed` and may skip work on `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Unchanged,
    Changed,
}

/// Read-only copy of the session, taken for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub catalog: Catalog,
    /// Course shown in the main view (explicit selection or the first course).
    pub selected_course: Option<String>,
    pub delete_pending: bool,
}

impl SessionSnapshot {
    /// Lessons of the shown course, if any course is shown.
    #[must_use]
    pub fn selected_lessons(&self) -> Option<&[Lesson]> {
        self.selected_course
            .as_deref()
            .and_then(|title| self.catalog.course(title))
    }
}

/// A completed lesson together with what was learned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedNote {
    pub lesson: String,
    pub what_learned: String,
}

impl From<&Lesson> for CompletedNote {
    fn from(lesson: &Lesson) -> Self {
        Self {
            lesson: lesson.name().to_owned(),
            what_learned: lesson.what_learned().to_owned(),
        }
    }
}
