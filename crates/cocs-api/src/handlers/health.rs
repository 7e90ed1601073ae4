//! Health check handler for service monitoring.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` while the process serves.
    pub status: &'static str,
    /// Service identifier for multi-service monitoring.
    pub service: &'static str,
}

/// Health check endpoint handler.
///
/// The relay holds no state and no connections, so liveness is the only
/// meaningful signal: if this responds, the service can relay. Designed
/// to be called frequently by load balancers; does no work.
#[instrument(name = "health_check")]
pub async fn health_check() -> Response {
    debug!("Health check");
    (StatusCode::OK, Json(HealthResponse { status: "ok", service: "cocs-bot" })).into_response()
}
