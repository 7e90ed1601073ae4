//! Mock Discord API for delivery testing.

use std::time::Duration;

use http::StatusCode;
use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Wiremock-backed Discord API double.
///
/// Records every request it receives; tests inspect the recorded message
/// bodies to assert on embed content and delivery counts.
pub struct MockDiscord {
    server: MockServer,
}

impl MockDiscord {
    /// Starts a mock server on a random local port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Base URL to use as the client's `api_base`.
    pub fn api_base(&self) -> String {
        self.server.uri()
    }

    /// Configures the channel messages endpoint to answer with `status`.
    pub async fn mock_messages(&self, channel_id: &str, status: StatusCode) {
        let body = if status.is_success() {
            serde_json::json!({"id": "1234567890", "channel_id": channel_id})
        } else {
            serde_json::json!({"message": "Mock Discord error", "code": 0})
        };

        Mock::given(method("POST"))
            .and(path(format!("/channels/{channel_id}/messages")))
            .respond_with(ResponseTemplate::new(status.as_u16()).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Configures the channel messages endpoint to answer slowly.
    ///
    /// Used to exercise client-side timeout handling.
    pub async fn mock_messages_with_delay(
        &self,
        channel_id: &str,
        status: StatusCode,
        delay: Duration,
    ) {
        Mock::given(method("POST"))
            .and(path(format!("/channels/{channel_id}/messages")))
            .respond_with(ResponseTemplate::new(status.as_u16()).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// All message-create requests received so far.
    pub async fn received(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.url.path().ends_with("/messages"))
            .collect()
    }

    /// Number of message-create requests received so far.
    pub async fn request_count(&self) -> usize {
        self.received().await.len()
    }

    /// JSON bodies of every message-create request received so far.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.received()
            .await
            .iter()
            .filter_map(|req| serde_json::from_slice(&req.body).ok())
            .collect()
    }

    /// Embeds across every received message, flattened in arrival order.
    pub async fn received_embeds(&self) -> Vec<Value> {
        self.received_bodies()
            .await
            .iter()
            .filter_map(|body| body.get("embeds").and_then(Value::as_array).cloned())
            .flatten()
            .collect()
    }
}
