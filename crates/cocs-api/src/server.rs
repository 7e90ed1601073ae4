//! HTTP server configuration and request routing.
//!
//! Provides Axum server setup with middleware stack and graceful
//! shutdown for the webhook relay. Requests flow through middleware in
//! order:
//! 1. Request ID generation
//! 2. CORS headers (permissive origin)
//! 3. Request/response logging
//! 4. Timeout enforcement
//! 5. Handler execution
//!
//! # Graceful Shutdown
//!
//! The server handles SIGTERM gracefully: it stops accepting new
//! connections and waits for in-flight requests. Nothing is persisted,
//! so aborted requests need no cleanup.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use cocs_delivery::DiscordClient;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::{config::Config, handlers};

/// Shared application state cloned into every request.
///
/// Holds only immutable configuration and the pooled Discord client;
/// requests never share mutable state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration, validated at startup.
    pub config: Arc<Config>,
    /// Discord REST client.
    pub discord: DiscordClient,
}

impl AppState {
    /// Creates state from an already-constructed client.
    pub fn new(config: Config, discord: DiscordClient) -> Self {
        Self { config: Arc::new(config), discord }
    }

    /// Creates state by building the Discord client from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed from the
    /// configured timeouts.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let discord =
            DiscordClient::new(config.discord_token.as_str(), config.to_client_config())?;
        Ok(Self::new(config, discord))
    }
}

/// Creates the Axum router with all routes and middleware.
///
/// The webhook handler is mounted both at `/webhook` and at the root,
/// matching what hosting providers are configured with in the wild.
/// Unknown paths fall through to 404; known paths with wrong methods
/// get 405.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let request_timeout = Duration::from_secs(state.config.request_timeout);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", post(handlers::handle_webhook).options(handlers::preflight))
        .route("/webhook", post(handlers::handle_webhook).options(handlers::preflight))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Middleware to inject request ID into all responses.
///
/// Adds X-Request-Id header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address and serves requests until a shutdown
/// signal is received.
///
/// # Errors
///
/// Returns `std::io::Error` if the port is already in use or the
/// network interface is unavailable.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
///
/// Enables graceful shutdown on:
/// - CTRL+C (SIGINT) - Development
/// - SIGTERM - Kubernetes/Docker
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
