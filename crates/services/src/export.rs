//! CSV export of a course's lessons.

use std::path::{Path, PathBuf};

use progress_core::model::Lesson;

use crate::error::ExportError;

/// File name offered for the downloaded export.
pub const EXPORT_FILE_NAME: &str = "learning_progress.csv";

/// MIME type of the export.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

const HEADER: [&str; 5] = ["Course", "lesson", "completed", "needs_revision", "what_learned"];

/// A rendered export, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    bytes: Vec<u8>,
}

impl CsvExport {
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        EXPORT_CONTENT_TYPE
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the export as `learning_progress.csv` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Write` if the directory or file cannot be written.
    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(EXPORT_FILE_NAME);
        self.write_to(&path).await?;
        Ok(path)
    }

    /// Write the export to an explicit path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Write` if the file cannot be written.
    pub async fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let write_error = |source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
            }
        }
        tokio::fs::write(path, &self.bytes).await.map_err(write_error)
    }
}

/// Render one course as CSV: a header row, then one row per lesson with the
/// course title in the leading `Course` column.
///
/// Flags are written as `True`/`False`, matching spreadsheet exports made by
/// earlier versions of the tracker.
///
/// # Errors
///
/// Returns `ExportError` if a record cannot be encoded.
pub fn render_course_csv(title: &str, lessons: &[Lesson]) -> Result<CsvExport, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for lesson in lessons {
        writer.write_record([
            title,
            lesson.name(),
            flag(lesson.completed()),
            flag(lesson.needs_revision()),
            lesson.what_learned(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.into_error()))?;
    Ok(CsvExport { bytes })
}

fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
