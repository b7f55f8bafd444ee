#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export;
pub mod session;

pub use progress_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExportError, SessionError};
pub use export::{CsvExport, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, render_course_csv};
pub use session::{
    CompletedNote, Refresh, SessionController, SessionOptions, SessionSnapshot,
};
