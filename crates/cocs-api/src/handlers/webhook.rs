//! Webhook ingestion handler.
//!
//! Accepts deployment webhooks from the hosting provider, verifies the
//! shared secret, normalizes the payload, and relays terminal build
//! results to Discord. Non-terminal statuses acknowledge without
//! delivering.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use cocs_core::{format, is_valid, normalize, RelayError};
use cocs_delivery::render;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::{crypto::verify_shared_secret, server::AppState};

/// Header carrying the shared webhook secret.
const SECRET_HEADER: &str = "x-webhook-secret";

/// Acknowledgement for a delivered notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    /// Always true; errors use the error response shape.
    pub success: bool,
    /// Identifier of the deployment that was relayed.
    pub deployment_id: String,
    /// Terminal status that was relayed.
    pub status: String,
}

/// Acknowledgement for a suppressed non-terminal event.
#[derive(Debug, Serialize)]
pub struct SkipAck {
    /// Always true; a skipped event is a successful no-op.
    pub success: bool,
    /// Explanation of why nothing was delivered.
    pub message: &'static str,
    /// The non-terminal status that was suppressed.
    pub status: String,
}

/// Error response with code and message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message.
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Stable error code for client disambiguation.
    pub code: String,
    /// Human-readable error description; generic for server-side faults.
    pub message: String,
}

/// Outcome of webhook processing, both flavors of 200.
enum WebhookOutcome {
    Delivered { deployment_id: String, status: String },
    Skipped { status: String },
}

impl IntoResponse for WebhookOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Delivered { deployment_id, status } => (
                StatusCode::OK,
                Json(WebhookAck { success: true, deployment_id, status }),
            )
                .into_response(),
            Self::Skipped { status } => (
                StatusCode::OK,
                Json(SkipAck {
                    success: true,
                    message: "skipping non-terminal deployment status",
                    status,
                }),
            )
                .into_response(),
        }
    }
}

/// Ingests a deployment webhook and relays terminal results to Discord.
///
/// Processing order: configuration guard, shared-secret verification,
/// JSON parse, shape validation, normalization, commit URL derivation,
/// terminal-status gate, delivery.
///
/// # Errors
///
/// - 401: shared secret missing or mismatched
/// - 400: body is not JSON or does not describe a deployment event
/// - 500: configuration missing, delivery failure, or internal error
#[instrument(
    name = "handle_webhook",
    skip(state, headers, body),
    fields(content_length = body.len()),
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match process_webhook(&state, &headers, &body).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => error_response(&e),
    }
}

/// CORS preflight acknowledgement for the webhook routes.
pub async fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert("allow", HeaderValue::from_static("POST, OPTIONS"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static("POST, OPTIONS"));
    response
}

async fn process_webhook(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<WebhookOutcome, RelayError> {
    let config = &state.config;

    if config.discord_token.is_empty() {
        return Err(RelayError::ConfigurationMissing { name: "discord_token" });
    }
    if config.discord_channel_id.is_empty() {
        return Err(RelayError::ConfigurationMissing { name: "discord_channel_id" });
    }

    if let Some(expected) = config.webhook_secret() {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if !verify_shared_secret(provided, expected) {
            warn!("Webhook secret verification failed");
            return Err(RelayError::Unauthorized);
        }
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::MalformedInput(format!("invalid JSON: {e}")))?;

    if !is_valid(&payload) {
        return Err(RelayError::MalformedInput(
            "payload does not describe a deployment event".to_string(),
        ));
    }

    let mut info = normalize(&payload);
    debug!(
        deployment_id = %info.id,
        status = %info.status,
        branch = %info.branch,
        "Payload normalized"
    );

    if info.commit_url.is_empty() {
        info.commit_url =
            format::commit_url(&config.repo_owner, &config.repo_name, &info.commit_hash);
    }

    if !info.is_success && !info.is_failure {
        info!(status = %info.status, "Skipping non-terminal deployment status");
        return Ok(WebhookOutcome::Skipped { status: info.status });
    }

    let embed = render(&info);
    state
        .discord
        .send_embed(&config.discord_channel_id, &embed)
        .await
        .map_err(|e| RelayError::Delivery(e.to_string()))?;

    info!(deployment_id = %info.id, status = %info.status, "Notification relayed");
    Ok(WebhookOutcome::Delivered { deployment_id: info.id, status: info.status })
}

/// Creates a standardized error response.
///
/// Server-side failures get a generic message; the specific cause stays
/// in the logs.
fn error_response(error: &RelayError) -> Response {
    let status = match error {
        RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
        RelayError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        RelayError::ConfigurationMissing { .. }
        | RelayError::Delivery(_)
        | RelayError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %error, "Webhook processing failed");
    } else {
        warn!(error = %error, "Webhook rejected");
    }

    let message =
        if error.is_public() { error.to_string() } else { "internal server error".to_string() };

    let body =
        ErrorResponse { error: ErrorDetail { code: error.code().to_string(), message } };

    (status, Json(body)).into_response()
}
