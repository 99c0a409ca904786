//! Route table

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use log::info;
use tower_http::services::ServeDir;

use crate::middleware::log_request;
use crate::server::core::AppState;
use crate::server::handlers;

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.config.max_upload_bytes()).unwrap_or(usize::MAX);

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/folder/*subpath", get(handlers::folder))
        .route(
            "/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/delete", post(handlers::delete))
        .route("/files/*path", get(handlers::serve_file));

    if let Some(static_dir) = state.config.static_dir() {
        info!("Serving static assets from {}", static_dir.display());
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
