//! Portable Cloud - Entry Point
//!
//! A local web-based file manager serving a single storage directory.

use log::{error, info};
use std::process::ExitCode;

use portable_cloud::utils::logging::setup_logging;
use portable_cloud::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Starting Portable Cloud server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!("Server stopped with error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
