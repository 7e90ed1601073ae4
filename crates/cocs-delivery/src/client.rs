//! HTTP client for Discord message delivery.
//!
//! Wraps a pooled `reqwest` client with bot-token authorization and
//! categorizes response errors for the webhook handler. The API base URL
//! is configurable so tests can point the client at a local mock.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

use crate::{
    embed::Embed,
    error::{DeliveryError, Result},
};

/// Production Discord REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Response bodies kept for error context are cut to this size.
const MAX_ERROR_BODY_SIZE: usize = 1024;

/// Configuration for the Discord delivery client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Discord REST API.
    pub api_base: String,
    /// Timeout for delivery requests.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "cocs-bot/1.0".to_string(),
        }
    }
}

/// Receipt for a successful delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// HTTP status code returned by Discord.
    pub status_code: u16,
    /// Total duration of the request.
    pub duration: Duration,
}

/// Discord REST client holding only the bot token and a pooled
/// connection; cloning is cheap and there is no shared mutable state.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    client: reqwest::Client,
    config: ClientConfig,
    token: String,
}

impl DiscordClient {
    /// Creates a new client with the given bot token and configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Configuration` if the HTTP client cannot
    /// be built with the provided settings.
    pub fn new(token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                DeliveryError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config, token: token.into() })
    }

    /// Creates a client with the default (production) configuration.
    pub fn with_defaults(token: impl Into<String>) -> Result<Self> {
        Self::new(token, ClientConfig::default())
    }

    /// Posts an embed to a channel-scoped messages endpoint.
    ///
    /// Sends `{"embeds": [embed]}` with `Authorization: Bot {token}`.
    /// Any non-2xx response is a delivery failure; no retry is performed.
    ///
    /// # Errors
    ///
    /// - `Network` for connection failures
    /// - `Timeout` for request timeouts
    /// - `ClientError` for 4xx responses
    /// - `ServerError` for 5xx responses
    pub async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<DeliveryReceipt> {
        let url = format!("{}/channels/{channel_id}/messages", self.config.api_base);
        let span = info_span!("discord_delivery", channel_id = %channel_id, url = %url);

        async move {
            let start_time = std::time::Instant::now();
            tracing::debug!("Posting notification embed");

            let body = serde_json::json!({ "embeds": [embed] });

            let response = match self
                .client
                .post(&url)
                .header("Authorization", format!("Bot {}", self.token))
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Request failed: {}", e);
                    if e.is_timeout() {
                        return Err(DeliveryError::timeout(self.config.timeout.as_secs()));
                    }
                    if e.is_connect() {
                        return Err(DeliveryError::network(format!("connection failed: {e}")));
                    }
                    return Err(DeliveryError::network(e.to_string()));
                },
            };

            let duration = start_time.elapsed();
            let status = response.status();
            let status_code = status.as_u16();

            if status.is_success() {
                tracing::info!(status = status_code, "Notification delivered");
                return Ok(DeliveryReceipt { status_code, duration });
            }

            let body = read_error_body(response).await;
            tracing::warn!(status = status_code, "Delivery rejected");

            if status.is_client_error() {
                Err(DeliveryError::client_error(status_code, body))
            } else {
                Err(DeliveryError::server_error(status_code, body))
            }
        }
        .instrument(span)
        .await
    }
}

/// Reads a failed response body for error context, size-capped.
async fn read_error_body(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(bytes) => {
            if bytes.len() > MAX_ERROR_BODY_SIZE {
                let suffix = "... (truncated)";
                let truncated = String::from_utf8_lossy(&bytes[..MAX_ERROR_BODY_SIZE - suffix.len()]);
                format!("{truncated}{suffix}")
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            }
        },
        Err(e) => format!("[failed to read response body: {e}]"),
    }
}
