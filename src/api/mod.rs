//! api
//!
//! HTTP surface for CDP submissions.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `POST` | `/api/v0/inventory/{inventory}/cdp` | submit to CDP |
//! | `GET` | `/api/v0/inventory/{inventory}/cdp/preview` | totals, no CDP calls |
//! | `GET` | `/health` | liveness |
//!
//! Errors are JSON `{"error": message, "status": code}`.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::report::CdpReportBuilder;

pub use error::{ApiError, ApiResult};

/// Shared state for handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub builder: Arc<CdpReportBuilder>,
}

impl AppState {
    pub fn new(builder: CdpReportBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v0/inventory/{inventory}/cdp", post(handlers::submit_cdp))
        .route(
            "/api/v0/inventory/{inventory}/cdp/preview",
            get(handlers::preview_cdp),
        )
        .with_state(state)
}

/// Serve the router on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, mode = %state.builder.mode(), "CDP API listening");
    axum::serve(listener, create_router(state)).await
}
