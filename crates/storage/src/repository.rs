use async_trait::async_trait;
use progress_core::model::Catalog;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonFileRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog at {path} is not readable: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Repository contract for the catalog document.
///
/// The catalog is always read and written whole.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Read the full catalog, or the empty catalog if nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store exists but cannot be read
    /// or parsed.
    async fn load(&self) -> Result<Catalog, StorageError>;

    /// Replace the stored catalog with `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be written.
    async fn save(&self, catalog: &Catalog) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    catalog: Arc<Mutex<Option<Catalog>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `catalog` already stored.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(Some(catalog))),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of successful `save` calls so far.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the counter lock is poisoned.
    pub fn save_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .saves
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn load(&self) -> Result<Catalog, StorageError> {
        let guard = self
            .catalog
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        {
            let mut guard = self
                .catalog
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            *guard = Some(catalog.clone());
        }
        let mut saves = self
            .saves
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *saves += 1;
        Ok(())
    }
}

/// Holds the catalog repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            catalog: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Build a `Storage` backed by the JSON document at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(JsonFileRepository::new(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progress_core::model::{LessonEdit, NewCourse};

    #[tokio::test]
    async fn empty_repository_loads_default_catalog() {
        let repo = InMemoryRepository::new();
        let catalog = repo.load().await.unwrap();
        assert!(catalog.is_empty());
        assert_eq!(repo.save_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn round_trips_catalog() {
        let repo = InMemoryRepository::new();
        let mut catalog = Catalog::new();
        catalog.insert_course(NewCourse::parse("Algebra", "Intro\nGraphs").unwrap());
        catalog
            .edit_lesson("Algebra", 1, LessonEdit::Completed(true))
            .unwrap();

        repo.save(&catalog).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), catalog);
        assert_eq!(repo.save_count().unwrap(), 1);
    }
}
