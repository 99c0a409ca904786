//! Error handling
//!
//! Defines error types and their mapping to HTTP responses.

pub mod handlers;
pub mod types;

pub use types::*;
