//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use progress_core::model::{CourseError, LessonError};
use storage::StorageError;

/// Errors emitted while rendering or writing a CSV export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Flush(#[source] std::io::Error),
    #[error("failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `SessionController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("course not found: {0}")]
    UnknownCourse(String),
    #[error("no course is selected")]
    NoSelection,
    #[error("session state is unavailable: {0}")]
    StatePoisoned(String),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<CourseError> for SessionError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::NotFound(title) => SessionError::UnknownCourse(title),
            CourseError::Lesson(err) => SessionError::Lesson(err),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
