//! Catalog persisted as a single JSON document on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use progress_core::model::Catalog;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::repository::{CatalogRepository, StorageError};

/// File name used when no explicit path is configured.
pub const DEFAULT_FILE_NAME: &str = "learning_data.json";

#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CatalogRepository for JsonFileRepository {
    async fn load(&self) -> Result<Catalog, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no catalog file yet, starting empty");
                return Ok(Catalog::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        // A freshly created, never-written file counts as "no catalog yet".
        if content.trim().is_empty() {
            return Ok(Catalog::default());
        }

        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|err| StorageError::Corrupt {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        debug!(
            path = %self.path.display(),
            courses = catalog.course_count(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| self.io_error(err))?;
            }
        }

        let json = serde_json::to_vec(catalog)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        // Write beside the target, flush to disk, then swap it in.
        let tmp_path = self.temp_path();
        let mut tmp_file = fs::File::create(&tmp_path)
            .await
            .map_err(|err| self.io_error(err))?;
        tmp_file
            .write_all(&json)
            .await
            .map_err(|err| self.io_error(err))?;
        tmp_file.sync_all().await.map_err(|err| self.io_error(err))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| self.io_error(err))?;

        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            courses = catalog.course_count(),
            "saved catalog"
        );
        Ok(())
    }
}
