//! Error types for the store layer.

use crate::WatchId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The key is locked against writes.
    #[error("key is read-only: {0}")]
    ReadOnly(String),

    /// The key is not an absolute `/`-delimited path.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// A list value mixes element kinds or nests lists.
    #[error("invalid list value: {0}")]
    InvalidList(String),

    /// No subscription with this id.
    #[error("unknown watch: {0}")]
    UnknownWatch(WatchId),

    /// IO error (snapshot files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
