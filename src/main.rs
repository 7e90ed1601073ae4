//! cocs-bot webhook relay service.
//!
//! Main entry point. Loads configuration, builds the Discord client,
//! and serves the webhook relay until shutdown.

use anyhow::{Context, Result};
use cocs_api::{AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting cocs-bot webhook relay");

    // Load configuration from environment
    let config = Config::load()?;
    info!(
        server_addr = %format!("{}:{}", config.host, config.port),
        channel_id = %config.discord_channel_id,
        token = %config.token_masked(),
        secret_verification = config.webhook_secret().is_some(),
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;
    let state = AppState::from_config(config).context("Failed to build Discord client")?;

    info!(addr = %addr, "cocs-bot is ready to receive webhooks");

    cocs_api::start_server(state, addr).await.context("Server failed")?;

    info!("cocs-bot shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,cocs=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
