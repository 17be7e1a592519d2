//! Health check endpoint

use axum::{routing::get, Json, Router};
use makerbench_common::api::HealthResponse;

use crate::AppState;

/// GET /health
///
/// Served bare (no envelope) and without authentication.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "makerbench-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
