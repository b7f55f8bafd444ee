use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson index {index} is out of range for a course with {len} lessons")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One trackable unit of a course.
///
/// Serialized with the field names of the on-disk catalog: `lesson`,
/// `completed`, `needs_revision`, `what_learned`. All four are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(rename = "lesson")]
    name: String,
    completed: bool,
    needs_revision: bool,
    what_learned: String,
}

impl Lesson {
    /// Creates a fresh lesson: not completed, no revision flag, empty note.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
            needs_revision: false,
            what_learned: String::new(),
        }
    }

    /// Rebuilds a lesson with every field supplied (e.g. from storage or tests).
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        completed: bool,
        needs_revision: bool,
        what_learned: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            completed,
            needs_revision,
            what_learned: what_learned.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn needs_revision(&self) -> bool {
        self.needs_revision
    }

    #[must_use]
    pub fn what_learned(&self) -> &str {
        &self.what_learned
    }

    /// Applies a single-field edit in place.
    ///
    /// Returns `true` when the stored value actually changed.
    pub fn apply(&mut self, edit: LessonEdit) -> bool {
        match edit {
            LessonEdit::Name(name) => replace_if_changed(&mut self.name, name),
            LessonEdit::Completed(value) => replace_if_changed(&mut self.completed, value),
            LessonEdit::NeedsRevision(value) => {
                replace_if_changed(&mut self.needs_revision, value)
            }
            LessonEdit::WhatLearned(note) => replace_if_changed(&mut self.what_learned, note),
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// An edit to exactly one lesson field, as produced by an edit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonEdit {
    Name(String),
    Completed(bool),
    NeedsRevision(bool),
    WhatLearned(String),
}

impl LessonEdit {
    /// Column name of the edited field in the persisted record.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            LessonEdit::Name(_) => "lesson",
            LessonEdit::Completed(_) => "completed",
            LessonEdit::NeedsRevision(_) => "needs_revision",
            LessonEdit::WhatLearned(_) => "what_learned",
        }
    }
}

/// Splits a newline-delimited lesson list into fresh lessons.
///
/// Lines are trimmed; blank lines are skipped. Order is preserved.
#[must_use]
pub fn lessons_from_lines(lesson_lines: &str) -> Vec<Lesson> {
    lesson_lines
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Lesson::new)
        .collect()
}
