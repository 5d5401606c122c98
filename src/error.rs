use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Errors that can occur in service layer operations.
///
/// None of them is fatal: the presentation layer turns each one into a notice and the
/// session carries on.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// The board could not be encoded for storage.
    #[error("failed to encode the board for storage")]
    Encoding(#[source] StorageError),
    /// Bad credentials, or an operation the current identity may not perform.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Export requested while the history log is empty.
    #[error("nothing to export: the history log is empty")]
    EmptyExport,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization { .. } => ServiceError::Encoding(err),
            StorageError::Unavailable { .. } => ServiceError::Unavailable(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(format!("validation failed: {err}"))
    }
}
