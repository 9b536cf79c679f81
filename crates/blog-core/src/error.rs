//! Error types for blog-core.

use thiserror::Error;

/// Result type alias for blog-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by services and repositories.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity with the given id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before reaching the repository.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure inside the persistence backend.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a `NotFound` error for an entity id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Wrap a backend error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Structural precondition violations of the dynamic merge entry point.
///
/// These only arise from programming errors: the service layer always merges
/// two values of the same record type through the statically typed path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The update value is not a record.
    #[error("source is not a record: {0}")]
    SourceNotRecord(&'static str),

    /// The destination is null or cannot be borrowed mutably.
    #[error("destination is not a usable mutable reference: {0}")]
    DestinationNotReference(&'static str),

    /// The destination does not refer to a record.
    #[error("destination does not refer to a record: {0}")]
    DestinationNotRecord(&'static str),

    /// Destination and source are different record types.
    #[error("source and destination types do not match: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
