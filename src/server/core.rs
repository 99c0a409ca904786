use axum::Router;
use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::routes::build_router;
use crate::storage::PathSandbox;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sandbox: Arc<PathSandbox>,
}

impl AppState {
    /// `storage_root` must be absolute; see [`ServerConfig::prepare_storage_root`]
    pub fn new(config: ServerConfig, storage_root: &Path) -> Self {
        Self {
            config: Arc::new(config),
            sandbox: Arc::new(PathSandbox::new(storage_root)),
        }
    }
}

pub struct Server {
    listener: TcpListener,
    router: Router,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Prepares the storage root and binds the listener
    pub async fn new(config: ServerConfig) -> io::Result<Self> {
        let storage_root = config.prepare_storage_root().map_err(|e| {
            error!(
                "Failed to prepare storage root {}: {}",
                config.storage_root.display(),
                e
            );
            e
        })?;
        info!("Storage root: {}", storage_root.display());

        let listen_addr = config.listen_addr();
        let listener = match TcpListener::bind(&listen_addr).await {
            Ok(listener) => {
                info!("Server bound to {}", listen_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", listen_addr, e);
                return Err(e);
            }
        };

        let state = AppState::new(config, &storage_root);
        let config = Arc::clone(&state.config);

        Ok(Self {
            listener,
            router: build_router(state),
            config,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until Ctrl+C
    pub async fn start(self) -> io::Result<()> {
        info!(
            "Starting Portable Cloud on {} (max upload {} MB)",
            self.local_addr()?,
            self.config.max_upload_size_mb
        );

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, stopping server");
}
