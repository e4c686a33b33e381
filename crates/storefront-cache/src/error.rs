//! Store error types.

use thiserror::Error;

/// Errors that can occur when using the local store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store at {path}: {reason}")]
    OpenError { path: String, reason: String },

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to persist the store.
    #[error("Store operation failed: {0}")]
    StoreError(#[from] std::io::Error),
}
