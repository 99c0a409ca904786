//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Setup logging for the server; `RUST_LOG` overrides the default filter
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();
}
