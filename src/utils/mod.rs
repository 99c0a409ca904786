//! Utility functions
//!
//! Provides byte formatting and logging setup.

pub mod bytes;
pub mod logging;

pub use bytes::format_size;
