//! HTTP server
//!
//! Router, request handlers and response shapes. Handlers parse request
//! parameters and delegate to the catalog, pagination and storage modules.

pub mod core;
pub mod handlers;
pub mod responses;
pub mod routes;

pub use self::core::{AppState, Server};
pub use routes::build_router;
