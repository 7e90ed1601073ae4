//! Core domain types and payload normalization.
//!
//! Provides the canonical deployment record, the permissive payload
//! validator, status classification, and the formatting helpers shared by
//! the notification renderer. All other crates depend on these
//! foundational types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod deployment;
pub mod error;
pub mod format;

pub use deployment::{is_valid, normalize, DeploymentInfo};
pub use error::{RelayError, Result};
