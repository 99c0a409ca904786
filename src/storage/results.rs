//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// Result of a file retrieval operation
#[derive(Debug, Clone)]
pub struct RetrieveResult {
    pub file_path: PathBuf,
    pub directory: PathBuf,
    pub file_name: String,
}

/// Result of a file storage operation
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub file_path: PathBuf,
    /// Name the file was stored under, after sanitizing and collision suffixing
    pub stored_name: String,
    pub bytes_written: u64,
}

/// Result of a deletion
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub path: PathBuf,
    pub was_directory: bool,
}
