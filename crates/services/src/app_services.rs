use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::session::{SessionController, SessionOptions};

/// Assembles app-facing services over one catalog store.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionController>,
    export_dir: PathBuf,
}

impl AppServices {
    /// Build services backed by the JSON catalog at `data_file`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog exists but cannot be loaded.
    pub async fn new_json(
        data_file: &Path,
        export_dir: PathBuf,
        clock: Clock,
        options: SessionOptions,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::json_file(data_file), export_dir, clock, options).await
    }

    /// Build services over an already constructed `Storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be loaded.
    pub async fn from_storage(
        storage: Storage,
        export_dir: PathBuf,
        clock: Clock,
        options: SessionOptions,
    ) -> Result<Self, AppServicesError> {
        let session =
            Arc::new(SessionController::start(clock, Arc::clone(&storage.catalog), options).await?);
        Ok(Self {
            session,
            export_dir,
        })
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionController> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}
