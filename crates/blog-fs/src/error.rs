//! Error types for the filesystem store.

use blog_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors that can occur in filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// Store not found at the specified path.
    #[error("store not found at '{0}'")]
    StoreNotFound(PathBuf),

    /// Store already exists.
    #[error("store already exists at '{0}'")]
    StoreExists(PathBuf),

    /// Document not found.
    #[error("{collection} not found: {id}")]
    DocumentNotFound {
        collection: &'static str,
        id: uuid::Uuid,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<FsError> for CoreError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::DocumentNotFound { collection, id } => Self::not_found(collection, id),
            other => Self::storage(other),
        }
    }
}
