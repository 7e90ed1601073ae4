//! HTTP request handlers for the cocs-bot API.
//!
//! Handlers follow a consistent pattern: input validation with
//! appropriate status codes, tracing for observability, and standardized
//! JSON error responses that never leak internal details.

pub mod health;
pub mod webhook;

pub use health::health_check;
pub use webhook::{handle_webhook, preflight};
