//! Error types
//!
//! Defines the domain error type shared by the storage, catalog and HTTP layers.

use std::io;
use thiserror::Error;

/// Storage and request-validation errors
///
/// Variants carrying an `io::Error` keep the underlying detail for logging;
/// none of it is exposed to HTTP callers (see [`crate::error::handlers`]).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Missing or empty required field, or a name that sanitizes to nothing.
    /// The payload is the short message shown to the caller.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A user-supplied path resolved outside the storage root
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The target of an operation does not exist
    #[error("not found: {0}")]
    NotFound(String),

    #[error("delete failed: {0}")]
    DeleteFailed(#[source] io::Error),

    #[error("upload failed: {0}")]
    UploadFailed(#[source] io::Error),

    /// Request body exceeded the configured upload limit
    #[error("payload exceeds the {max_bytes} byte upload limit")]
    OversizedPayload { max_bytes: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used across the storage layer
pub type StorageResult<T> = Result<T, StorageError>;
