//! Discord embed rendering for deployment notifications.
//!
//! Pure and deterministic: the same deployment record always renders the
//! same document. Layout follows a fixed field order with per-field
//! inline flags; fields whose source value is empty are omitted.

use cocs_core::{
    format::{format_duration, short_hash},
    DeploymentInfo,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Embed color for successful builds (green).
pub const COLOR_SUCCESS: u32 = 0x2ECC71;

/// Embed color for failed builds (red).
pub const COLOR_FAILURE: u32 = 0xE74C3C;

/// Embed color for unknown or in-progress statuses (yellow).
pub const COLOR_UNKNOWN: u32 = 0xF1C40F;

/// Commit messages longer than this are truncated.
const MAX_COMMIT_MESSAGE_LEN: usize = 200;

/// Error details are cut to this many characters.
const MAX_ERROR_LEN: usize = 1000;

/// A rendered notification document in Discord embed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    /// Embed title line.
    pub title: String,
    /// Embed description below the title.
    pub description: String,
    /// Accent color as a 24-bit RGB integer.
    pub color: u32,
    /// ISO-8601 timestamp rendered by the client.
    pub timestamp: String,
    /// Display fields in emission order.
    pub fields: Vec<EmbedField>,
    /// Footer line.
    pub footer: EmbedFooter,
}

/// A single display field within an embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field content, markdown-formatted.
    pub value: String,
    /// Whether the client may lay the field out side-by-side.
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: impl Into<String>) -> Self {
        Self { name: name.to_string(), value: value.into(), inline: true }
    }

    fn block(name: &str, value: impl Into<String>) -> Self {
        Self { name: name.to_string(), value: value.into(), inline: false }
    }
}

/// Embed footer text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer content.
    pub text: String,
}

/// Renders a deployment record as a Discord embed.
pub fn render(info: &DeploymentInfo) -> Embed {
    let (emoji, label, color) = status_style(info);

    let description = match &info.error_message {
        Some(message) if info.is_failure => message.clone(),
        _ if info.is_success => "Deployment completed successfully.".to_string(),
        _ => info.status.clone(),
    };

    let footer_id = if info.id.is_empty() { "unknown" } else { &info.id };

    Embed {
        title: format!("{emoji} Build {label} - {}", info.project_name),
        description,
        color,
        timestamp: info.created_at.clone(),
        fields: render_fields(info),
        footer: EmbedFooter { text: footer_id.to_string() },
    }
}

/// Palette, glyph, and label keyed by terminal status.
fn status_style(info: &DeploymentInfo) -> (&'static str, &'static str, u32) {
    if info.is_success {
        ("\u{2705}", "Success", COLOR_SUCCESS)
    } else if info.is_failure {
        ("\u{274C}", "Failure", COLOR_FAILURE)
    } else {
        ("\u{26A0}\u{FE0F}", "Unknown", COLOR_UNKNOWN)
    }
}

fn render_fields(info: &DeploymentInfo) -> Vec<EmbedField> {
    let mut fields = Vec::new();

    if !info.branch.is_empty() {
        fields.push(EmbedField::inline("Branch", format!("`{}`", info.branch)));
    }

    if !info.commit_hash.is_empty() {
        let short = short_hash(&info.commit_hash);
        let value = if info.commit_url.is_empty() {
            format!("`{short}`")
        } else {
            format!("[`{short}`]({})", info.commit_url)
        };
        fields.push(EmbedField::inline("Commit", value));
    }

    // Some(0.0) is included and renders "N/A"; the formatter owns that
    // conflation.
    if info.build_time.is_some() {
        fields.push(EmbedField::inline("Build Time", format_duration(info.build_time)));
    }

    if !info.commit_author.is_empty() {
        fields.push(EmbedField::inline("Author", info.commit_author.clone()));
    }

    if !info.commit_message.is_empty() {
        fields.push(EmbedField::block("Commit Message", truncate_message(&info.commit_message)));
    }

    if !info.deployment_url.is_empty() {
        fields.push(EmbedField::inline(
            "Deployment",
            format!("[View Deployment]({})", info.deployment_url),
        ));
    }

    if !info.build_logs_url.is_empty() {
        fields
            .push(EmbedField::inline("Build Logs", format!("[View Logs]({})", info.build_logs_url)));
    }

    if info.is_failure {
        if let Some(error) = &info.error {
            fields.push(EmbedField::block("Error Details", render_error(error)));
        }
    }

    fields
}

/// Truncates a commit message to 197 characters plus an ellipsis marker
/// when it exceeds 200, keeping the visible length at 200.
fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_COMMIT_MESSAGE_LEN {
        return message.to_string();
    }
    let head: String = message.chars().take(MAX_COMMIT_MESSAGE_LEN - 3).collect();
    format!("{head}...")
}

/// Stringifies an error value and wraps it in a preformatted block.
///
/// String errors pass through as-is; structured values are serialized to
/// JSON text. Content is cut at 1000 characters.
fn render_error(error: &Value) -> String {
    let text = match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let cut: String = text.chars().take(MAX_ERROR_LEN).collect();
    format!("```\n{cut}\n```")
}
