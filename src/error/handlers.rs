//! Error handlers
//!
//! Maps storage errors to HTTP status codes and fixed plain-text messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::error::types::StorageError;

/// Body for unmatched routes
pub const NOT_FOUND_PAGE: &str = "Page not found";

/// Body for unhandled server-side failures
pub const SERVER_ERROR_PAGE: &str = "Internal server error";

/// Log a storage error at a level matching its severity
pub fn handle_error(err: &StorageError) {
    match err {
        StorageError::DeleteFailed(_) | StorageError::UploadFailed(_) | StorageError::Io(_) => {
            error!("Request failed: {}", err)
        }
        _ => warn!("Request rejected: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status_code(err: &StorageError) -> StatusCode {
    match err {
        StorageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StorageError::AccessDenied(_) => StatusCode::FORBIDDEN,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::OversizedPayload { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        StorageError::DeleteFailed(_) | StorageError::UploadFailed(_) | StorageError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Message safe to show to the caller; never includes paths or I/O detail
pub fn public_message(err: &StorageError) -> String {
    match err {
        StorageError::InvalidInput(msg) => (*msg).to_string(),
        StorageError::AccessDenied(_) => "Access denied".to_string(),
        StorageError::NotFound(_) => "File not found".to_string(),
        StorageError::DeleteFailed(_) => "Delete failed".to_string(),
        StorageError::UploadFailed(_) => "Upload failed".to_string(),
        StorageError::OversizedPayload { max_bytes } => format!(
            "File too large. Maximum size is {}MB.",
            max_bytes / (1024 * 1024)
        ),
        StorageError::Io(_) => SERVER_ERROR_PAGE.to_string(),
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        handle_error(&self);
        (error_to_status_code(&self), public_message(&self)).into_response()
    }
}
