//! Payload normalization for loosely-specified deployment webhooks.
//!
//! The hosting provider's webhook payloads vary in shape between event
//! types and product versions: the event may arrive flat or nested under a
//! `deployment` key, and most attributes have more than one historical
//! field name. Normalization resolves each attribute against a fixed,
//! ordered list of candidate keys and produces one canonical record.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

/// Project name used when the payload does not carry one.
pub const DEFAULT_PROJECT: &str = "cocs";

/// Environment assumed when the payload does not carry one.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Branch assumed when the payload does not carry one.
pub const DEFAULT_BRANCH: &str = "main";

/// Canonical deployment record derived from a webhook payload.
///
/// Constructed fresh per request and never mutated afterwards, with one
/// exception: the webhook handler may attach a derived [`commit_url`]
/// when the payload did not already provide one.
///
/// [`commit_url`]: DeploymentInfo::commit_url
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentInfo {
    /// Deployment identifier; empty when the payload carried none.
    pub id: String,
    /// Project (site) name.
    pub project_name: String,
    /// Target environment, e.g. `production` or `preview`.
    pub environment: String,
    /// Raw status string as resolved from the payload.
    pub status: String,
    /// True iff `status == "success"`.
    pub is_success: bool,
    /// True iff `status == "failure"`.
    pub is_failure: bool,
    /// Source branch.
    pub branch: String,
    /// Full commit hash; possibly empty.
    pub commit_hash: String,
    /// Commit message; possibly empty.
    pub commit_message: String,
    /// Commit author; possibly empty.
    pub commit_author: String,
    /// Link to the deployed site; possibly empty.
    pub deployment_url: String,
    /// Link to the build logs; possibly empty.
    pub build_logs_url: String,
    /// Link to the commit; possibly empty.
    pub commit_url: String,
    /// Build duration in seconds, when reported.
    pub build_time: Option<f64>,
    /// ISO-8601 creation timestamp; defaults to the current time.
    pub created_at: String,
    /// Error payload, string or structured, when reported.
    pub error: Option<Value>,
    /// Human-readable error message, when one can be resolved.
    pub error_message: Option<String>,
    /// Build stage records in pipeline order.
    pub stages: Vec<Value>,
    /// Most recent stage record, when any.
    pub latest_stage: Option<Value>,
    /// Original untouched payload, retained for diagnostics only.
    pub raw: Value,
}

/// Validates that a payload plausibly describes a deployment event.
///
/// Deliberately permissive: accepts any JSON object carrying either a
/// deployment-identifying field (a `deployment` sub-object, a
/// `deployment_id`, or a top-level `id`) or a status-like field at any of
/// the known locations. A payload with only a status and nothing else is
/// valid. Non-objects, including null and arrays, are rejected.
pub fn is_valid(payload: &Value) -> bool {
    if !payload.is_object() {
        return false;
    }

    let has_identity = payload.get("deployment").is_some_and(Value::is_object)
        || lookup(payload, "deployment_id").is_some()
        || lookup(payload, "id").is_some();

    let has_status = lookup(payload, "status").is_some()
        || lookup(payload, "deployment.status").is_some()
        || lookup(payload, "deployment.latest_stage.status").is_some();

    has_identity || has_status
}

/// Normalizes an arbitrary deployment webhook payload.
///
/// The event is read from the `deployment` sub-object when present,
/// falling back to the payload itself for flat shapes. Every attribute
/// resolves first-present-wins across its candidate keys; values are
/// never merged across sources.
pub fn normalize(payload: &Value) -> DeploymentInfo {
    let event = payload.get("deployment").filter(|v| v.is_object()).unwrap_or(payload);

    let status = first_string(event, &["latest_stage.status", "status"])
        .or_else(|| first_string(payload, &["status"]))
        .unwrap_or_default();

    let stages = event
        .get("stages")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let latest_stage = lookup(event, "latest_stage").cloned().or_else(|| stages.last().cloned());

    let error = lookup(event, "error").cloned();
    let error_message = first_string(event, &["error_message"])
        .or_else(|| error.as_ref().and_then(Value::as_str).map(str::to_owned));

    DeploymentInfo {
        id: first_string(event, &["id", "deployment_id"]).unwrap_or_default(),
        project_name: first_string(event, &["project_name", "project"])
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
        environment: first_string(event, &["environment", "env"])
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        is_success: status == "success",
        is_failure: status == "failure",
        status,
        branch: first_string(event, &["branch", "metadata.branch"])
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        commit_hash: first_string(event, &["commit_hash", "commit"]).unwrap_or_default(),
        commit_message: first_string(event, &["commit_message", "metadata.commit_message"])
            .unwrap_or_default(),
        commit_author: first_string(event, &["commit_author", "author"]).unwrap_or_default(),
        deployment_url: first_string(event, &["url", "deployment_url"]).unwrap_or_default(),
        build_logs_url: first_string(event, &["build_logs_url", "logs_url"]).unwrap_or_default(),
        commit_url: first_string(event, &["commit_url"]).unwrap_or_default(),
        build_time: first(event, &["build_time", "duration"]).and_then(Value::as_f64),
        created_at: first_string(event, &["created_on", "created_at"])
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        error,
        error_message,
        stages,
        latest_stage,
        raw: payload.clone(),
    }
}

/// Presence test for resolved values.
///
/// Missing keys, `null`, and the empty string are absent; `0` and `false`
/// are present.
fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Resolves a dotted key path, returning the value only when present.
fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |value, key| value.get(key))
        .filter(|value| present(value))
}

/// First present value across an ordered list of candidate key paths.
fn first<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(root, path))
}

/// Like [`first`], rendered as a string.
///
/// Non-string scalars are stringified so numeric identifiers survive
/// normalization.
fn first_string(root: &Value, paths: &[&str]) -> Option<String> {
    first(root, paths).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
