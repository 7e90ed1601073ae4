//! Error types and result handling for webhook relay operations.
//!
//! Defines the service error taxonomy with stable codes for client
//! disambiguation. HTTP status mapping lives in the API crate; every
//! failure here is terminal for its request, there is no retry tier.

use thiserror::Error;

/// Result type alias using [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay error taxonomy.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required configuration value is absent or empty.
    #[error("missing configuration: {name}")]
    ConfigurationMissing {
        /// Name of the missing configuration value.
        name: &'static str,
    },

    /// Shared webhook secret missing or mismatched.
    #[error("webhook secret mismatch")]
    Unauthorized,

    /// Request body failed JSON parsing or shape validation.
    #[error("malformed payload: {0}")]
    MalformedInput(String),

    /// The chat platform rejected or never received the notification.
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    /// Generic error for wrapping anything unclassified.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    /// Returns the stable error code reported in error responses.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing { .. } => "config_missing",
            Self::Unauthorized => "unauthorized",
            Self::MalformedInput(_) => "invalid_payload",
            Self::Delivery(_) => "delivery_failed",
            Self::Other(_) => "internal",
        }
    }

    /// Whether the error message is safe to surface to the caller.
    ///
    /// Server-side failures (configuration, delivery, unclassified) are
    /// reported with a generic body so details never leak across the
    /// webhook boundary.
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MalformedInput(_))
    }
}
