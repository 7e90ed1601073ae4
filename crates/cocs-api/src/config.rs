//! Configuration management for the cocs-bot relay service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use cocs_delivery::client::{ClientConfig, DEFAULT_API_BASE};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The Discord bot token and channel id carry no defaults and must be
/// supplied; everything else works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Discord
    /// Bot token used for `Authorization: Bot {token}`.
    ///
    /// Environment variable: `DISCORD_TOKEN`
    #[serde(default, alias = "DISCORD_TOKEN")]
    pub discord_token: String,
    /// Channel that receives build notifications.
    ///
    /// Environment variable: `DISCORD_CHANNEL_ID`
    #[serde(default, alias = "DISCORD_CHANNEL_ID")]
    pub discord_channel_id: String,
    /// Discord REST API base URL. Overridable for tests and proxies.
    ///
    /// Environment variable: `DISCORD_API_BASE`
    #[serde(default = "default_api_base", alias = "DISCORD_API_BASE")]
    pub discord_api_base: String,

    // Webhook
    /// Shared secret expected in the `X-Webhook-Secret` header.
    /// Empty disables secret verification.
    ///
    /// Environment variable: `WEBHOOK_SECRET`
    #[serde(default, alias = "WEBHOOK_SECRET")]
    pub webhook_secret: String,

    // Repository
    /// Repository owner used to derive commit URLs.
    ///
    /// Environment variable: `REPO_OWNER`
    #[serde(default = "default_repo_owner", alias = "REPO_OWNER")]
    pub repo_owner: String,
    /// Repository name used to derive commit URLs.
    ///
    /// Environment variable: `REPO_NAME`
    #[serde(default = "default_repo_name", alias = "REPO_NAME")]
    pub repo_name: String,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Delivery
    /// HTTP timeout for Discord delivery in seconds.
    ///
    /// Environment variable: `DELIVERY_TIMEOUT_SECONDS`
    #[serde(default = "default_delivery_timeout", alias = "DELIVERY_TIMEOUT_SECONDS")]
    pub delivery_timeout_seconds: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides, then validate it.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be read or when validation rejects the
    /// merged result (missing Discord credentials, zero port).
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the delivery client's configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.discord_api_base.clone(),
            timeout: Duration::from_secs(self.delivery_timeout_seconds),
            user_agent: "cocs-bot/1.0".to_string(),
        }
    }

    /// The configured shared secret, or `None` when verification is
    /// disabled.
    pub fn webhook_secret(&self) -> Option<&str> {
        if self.webhook_secret.is_empty() {
            None
        } else {
            Some(&self.webhook_secret)
        }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Bot token with everything after a short prefix masked for logging.
    pub fn token_masked(&self) -> String {
        if self.discord_token.is_empty() {
            return "(unset)".to_string();
        }
        let prefix: String = self.discord_token.chars().take(6).collect();
        format!("{prefix}***")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.is_empty() {
            anyhow::bail!("DISCORD_TOKEN must be set");
        }

        if self.discord_channel_id.is_empty() {
            anyhow::bail!("DISCORD_CHANNEL_ID must be set");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.delivery_timeout_seconds == 0 {
            anyhow::bail!("delivery_timeout_seconds must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            discord_channel_id: String::new(),
            discord_api_base: default_api_base(),
            webhook_secret: String::new(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            delivery_timeout_seconds: default_delivery_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_repo_owner() -> String {
    "cocs-project".to_string()
}

fn default_repo_name() -> String {
    "cocs".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_delivery_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        vars: Vec<String>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Self { _lock: lock, vars: Vec::new(), originals: HashMap::new() }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            if !self.vars.contains(&key.to_string()) {
                self.originals.insert(key.to_string(), env::var(key).ok());
                self.vars.push(key.to_string());
            }
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                match self.originals.get(var) {
                    Some(Some(value)) => env::set_var(var, value),
                    Some(None) => env::remove_var(var),
                    None => {},
                }
            }
        }
    }

    #[test]
    fn defaults_fail_validation_without_credentials() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_passes_validation() {
        let config = Config {
            discord_token: "bot-token".to_string(),
            discord_channel_id: "123456".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_are_applied() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("DISCORD_TOKEN", "env-token");
        guard.set_var("DISCORD_CHANNEL_ID", "987654321");
        guard.set_var("WEBHOOK_SECRET", "hunter2");
        guard.set_var("REPO_OWNER", "octo-org");
        guard.set_var("REPO_NAME", "octo-site");
        guard.set_var("PORT", "9090");

        let config = Config::load().expect("Config should load with env overrides");

        assert_eq!(config.discord_token, "env-token");
        assert_eq!(config.discord_channel_id, "987654321");
        assert_eq!(config.webhook_secret(), Some("hunter2"));
        assert_eq!(config.repo_owner, "octo-org");
        assert_eq!(config.repo_name, "octo-site");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn empty_webhook_secret_disables_verification() {
        let config = Config::default();
        assert_eq!(config.webhook_secret(), None);
    }

    #[test]
    fn token_masking_hides_the_tail() {
        let config = Config {
            discord_token: "MTAxOTYzNjc3c2VjcmV0cGFydA".to_string(),
            ..Config::default()
        };

        let masked = config.token_masked();
        assert_eq!(masked, "MTAxOT***");
        assert!(!masked.contains("c2VjcmV0"));
    }

    #[test]
    fn invalid_port_fails_validation() {
        let config = Config {
            discord_token: "bot-token".to_string(),
            discord_channel_id: "123456".to_string(),
            port: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn socket_address_parsing() {
        let config = Config { host: "127.0.0.1".to_string(), port: 9000, ..Config::default() };

        let addr = config.parse_server_addr().expect("Should parse socket address");
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn client_config_carries_api_base_and_timeout() {
        let config = Config {
            discord_api_base: "http://127.0.0.1:4010".to_string(),
            delivery_timeout_seconds: 5,
            ..Config::default()
        };

        let client_config = config.to_client_config();
        assert_eq!(client_config.api_base, "http://127.0.0.1:4010");
        assert_eq!(client_config.timeout, Duration::from_secs(5));
    }
}
