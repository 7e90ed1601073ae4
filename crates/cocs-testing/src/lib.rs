//! Test support for cocs-bot.
//!
//! Provides a wiremock-backed stand-in for the Discord REST API so
//! delivery and end-to-end webhook tests can run without network access.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod discord;

pub use discord::MockDiscord;
