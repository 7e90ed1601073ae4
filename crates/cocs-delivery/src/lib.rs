//! Notification rendering and Discord REST delivery.
//!
//! Turns a canonical deployment record into a Discord embed document and
//! posts it to a channel-scoped endpoint with bearer-token authorization.
//! Delivery is fire-and-forget per request: a non-2xx response is a
//! delivery failure surfaced to the caller, never retried here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod embed;
pub mod error;

pub use client::{ClientConfig, DeliveryReceipt, DiscordClient};
pub use embed::{render, Embed, EmbedField, EmbedFooter};
pub use error::{DeliveryError, Result};
