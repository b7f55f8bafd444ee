use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::lesson::{Lesson, LessonEdit, LessonError, lessons_from_lines};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why a course submission was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NewCourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("a course needs at least one lesson")]
    NoLessons,
}

/// Errors from operating on a stored course.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CourseError {
    #[error("course not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Lesson(#[from] LessonError),
}

//
// ─── NEW COURSE ────────────────────────────────────────────────────────────────
//

/// A validated course submission: a non-empty title and at least one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    title: String,
    lessons: Vec<Lesson>,
}

impl NewCourse {
    /// Validate a raw title and newline-delimited lesson list.
    ///
    /// Titles are normalized: surrounding whitespace is trimmed before the
    /// title is used as the course key, so `"Algebra "` and `"Algebra"` name
    /// the same course. Each non-blank line becomes one fresh lesson whose
    /// name is trimmed the same way.
    ///
    /// # Errors
    ///
    /// Returns `NewCourseError::EmptyTitle` or `NewCourseError::NoLessons`.
    pub fn parse(title: &str, lesson_lines: &str) -> Result<Self, NewCourseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NewCourseError::EmptyTitle);
        }
        let lessons = lessons_from_lines(lesson_lines);
        if lessons.is_empty() {
            return Err(NewCourseError::NoLessons);
        }
        Ok(Self {
            title: title.to_owned(),
            lessons,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Presence marker stored for each active day.
pub const STREAK_MARK: u32 = 1;

/// The whole persisted document: every course plus the streak calendar.
///
/// Courses keep insertion order; overwriting a title keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    courses: IndexMap<String, Vec<Lesson>>,
    streak: BTreeMap<String, u32>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn course_titles(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(String::as_str)
    }

    #[must_use]
    pub fn first_title(&self) -> Option<&str> {
        self.courses.keys().next().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.courses.contains_key(title)
    }

    #[must_use]
    pub fn course(&self, title: &str) -> Option<&[Lesson]> {
        self.courses.get(title).map(Vec::as_slice)
    }

    pub fn courses(&self) -> impl Iterator<Item = (&str, &[Lesson])> {
        self.courses
            .iter()
            .map(|(title, lessons)| (title.as_str(), lessons.as_slice()))
    }

    /// Insert a course, replacing any course with the same title.
    ///
    /// Returns the lessons of the replaced course, if there was one.
    pub fn insert_course(&mut self, course: NewCourse) -> Option<Vec<Lesson>> {
        self.courses.insert(course.title, course.lessons)
    }

    /// Remove a course, preserving the order of the remaining ones.
    pub fn remove_course(&mut self, title: &str) -> Option<Vec<Lesson>> {
        self.courses.shift_remove(title)
    }

    /// Apply an edit to the lesson at `index` within `title`.
    ///
    /// Returns `true` when the lesson changed.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::NotFound` for an unknown title and
    /// `CourseError::Lesson` when `index` is out of range.
    pub fn edit_lesson(
        &mut self,
        title: &str,
        index: usize,
        edit: LessonEdit,
    ) -> Result<bool, CourseError> {
        let lessons = self
            .courses
            .get_mut(title)
            .ok_or_else(|| CourseError::NotFound(title.to_owned()))?;
        let len = lessons.len();
        let lesson = lessons
            .get_mut(index)
            .ok_or(LessonError::IndexOutOfRange { index, len })?;
        Ok(lesson.apply(edit))
    }

    /// Record activity on `date` in the streak calendar.
    ///
    /// Returns `true` if the day was not marked yet.
    pub fn mark_active(&mut self, date: NaiveDate) -> bool {
        let key = date.format("%Y-%m-%d").to_string();
        self.streak.insert(key, STREAK_MARK).is_none()
    }

    pub fn streak_days(&self) -> impl Iterator<Item = &str> {
        self.streak.keys().map(String::as_str)
    }
}
