//! File system storage management
//!
//! Handles path sandboxing, uploads, deletions and file retrieval.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

// Re-export commonly used types and functions
pub use operations::{delete_path, prepare_file_retrieval, store_upload};
pub use results::{DeleteResult, RetrieveResult, StoreResult};
pub use validation::{PathSandbox, sanitize_filename};
