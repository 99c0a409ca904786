//! Portable Cloud
//!
//! A local web file manager: browse, search, upload and delete files under a
//! single storage root.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod server;
pub mod storage;
pub mod utils;

pub use self::config::ServerConfig;
pub use server::Server;
