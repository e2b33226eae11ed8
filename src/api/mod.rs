//! JSON API over the estimation engine.
//!
//! Provides three endpoints:
//! - `GET /cities`: configured cities and their profiles
//! - `GET /panel?height_m=..&strict=..`: panel recommendation for a roof height
//! - `POST /estimate`: full estimate for a load and site

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::sizing::Estimator;

/// Immutable application state shared across all request handlers.
///
/// Wrapped in `Arc`; no locks needed since the reference data is read-only.
pub struct AppState {
    /// Estimator holding the reference data for this deployment.
    pub estimator: Estimator,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cities", get(handlers::get_cities))
        .route("/panel", get(handlers::get_panel))
        .route("/estimate", post(handlers::post_estimate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
