//! Health check endpoint.
//!
//! Reports liveness plus whether summaries can currently be produced.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// False when summary requests are bound to come back unavailable.
    pub summarizer_available: bool,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check handler.
///
/// Analysis works without a summarizer, so a missing key still reports healthy.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "logsieve-api",
        version: env!("CARGO_PKG_VERSION"),
        summarizer_available: state.summarizer().is_available(),
    })
}
