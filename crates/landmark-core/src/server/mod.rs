//! HTTP surface: `POST /classify` and `GET /health`.
//!
//! Every response body is JSON, including errors. Handlers never panic on bad
//! input; failures become `{"error": ...}` with a status matching the error
//! class.

mod error;
mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::service::ClassificationService;

pub use error::ErrorBody;

/// Headroom on top of the upload limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClassificationService>,
}

impl AppState {
    pub fn new(service: ClassificationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the router with body limits and request tracing.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.service.limits().max_upload_bytes() as usize + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/classify", post(handlers::classify))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{addr}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, draining connections"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {e}"),
    }
}
