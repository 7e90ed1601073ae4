//! Integration tests for notification embed rendering.
//!
//! Verifies palette selection, field order, conditional inclusion, and
//! the truncation rules against rendered documents.

use cocs_core::normalize;
use cocs_delivery::{
    embed::{COLOR_FAILURE, COLOR_SUCCESS, COLOR_UNKNOWN},
    render,
};
use serde_json::json;

#[test]
fn success_embed_has_green_palette_and_title() {
    let info = normalize(&json!({
        "deployment": {"id": "dep-1", "status": "success", "project_name": "cocs-site"}
    }));

    let embed = render(&info);
    assert_eq!(embed.title, "\u{2705} Build Success - cocs-site");
    assert_eq!(embed.color, COLOR_SUCCESS);
    assert_eq!(embed.description, "Deployment completed successfully.");
    assert_eq!(embed.footer.text, "dep-1");
}

#[test]
fn failure_embed_shows_error_message() {
    let info = normalize(&json!({
        "deployment": {"id": "dep-2", "status": "failure", "error": "exit code 1"}
    }));

    let embed = render(&info);
    assert_eq!(embed.color, COLOR_FAILURE);
    assert!(embed.title.contains("Build Failure"));
    assert_eq!(embed.description, "exit code 1");
}

#[test]
fn failure_without_error_message_shows_status() {
    let info = normalize(&json!({"deployment": {"id": "dep-3", "status": "failure"}}));
    assert_eq!(render(&info).description, "failure");
}

#[test]
fn unknown_status_uses_warning_palette_and_raw_status() {
    let info = normalize(&json!({"deployment": {"id": "dep-4", "status": "building"}}));

    let embed = render(&info);
    assert_eq!(embed.color, COLOR_UNKNOWN);
    assert!(embed.title.contains("Build Unknown"));
    assert_eq!(embed.description, "building");
}

#[test]
fn footer_falls_back_to_unknown_without_id() {
    let info = normalize(&json!({"status": "success"}));
    assert_eq!(render(&info).footer.text, "unknown");
}

#[test]
fn fields_follow_fixed_emission_order() {
    let info = normalize(&json!({
        "deployment": {
            "id": "dep-5",
            "status": "failure",
            "branch": "main",
            "commit_hash": "abcdef1234",
            "build_time": 65,
            "commit_author": "ada",
            "commit_message": "fix: reticulate splines",
            "url": "https://cocs.pages.dev",
            "build_logs_url": "https://dash.example.com/logs/dep-5",
            "error": "boom"
        }
    }));

    let embed = render(&info);
    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Branch",
            "Commit",
            "Build Time",
            "Author",
            "Commit Message",
            "Deployment",
            "Build Logs",
            "Error Details"
        ]
    );
}

#[test]
fn empty_fields_are_omitted() {
    let info = normalize(&json!({"deployment": {"id": "dep-6", "status": "success"}}));

    let embed = render(&info);
    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    // Branch defaults to "main" so it is always present; nothing else is.
    assert_eq!(names, vec!["Branch"]);
}

#[test]
fn branch_is_inline_code() {
    let info = normalize(&json!({"deployment": {"id": "dep-7", "branch": "release/v2"}}));
    let embed = render(&info);
    let branch = embed.fields.iter().find(|f| f.name == "Branch").expect("branch field");
    assert_eq!(branch.value, "`release/v2`");
    assert!(branch.inline);
}

#[test]
fn commit_links_to_commit_url_when_present() {
    let info = normalize(&json!({
        "deployment": {
            "id": "dep-8",
            "commit_hash": "abcdef1234",
            "commit_url": "https://github.com/cocs-project/cocs/commit/abcdef1234"
        }
    }));

    let embed = render(&info);
    let commit = embed.fields.iter().find(|f| f.name == "Commit").expect("commit field");
    assert_eq!(
        commit.value,
        "[`abcdef1`](https://github.com/cocs-project/cocs/commit/abcdef1234)"
    );
}

#[test]
fn commit_is_plain_code_without_url() {
    let info = normalize(&json!({"deployment": {"id": "dep-9", "commit_hash": "abcdef1234"}}));

    let embed = render(&info);
    let commit = embed.fields.iter().find(|f| f.name == "Commit").expect("commit field");
    assert_eq!(commit.value, "`abcdef1`");
}

#[test]
fn zero_build_time_is_included_as_not_available() {
    let info = normalize(&json!({"deployment": {"id": "dep-10", "build_time": 0}}));

    let embed = render(&info);
    let build_time = embed.fields.iter().find(|f| f.name == "Build Time").expect("field");
    assert_eq!(build_time.value, "N/A");
}

#[test]
fn absent_build_time_is_omitted() {
    let info = normalize(&json!({"deployment": {"id": "dep-11"}}));
    let embed = render(&info);
    assert!(embed.fields.iter().all(|f| f.name != "Build Time"));
}

#[test]
fn long_commit_message_is_truncated_to_two_hundred() {
    let message = "m".repeat(250);
    let info = normalize(&json!({"deployment": {"id": "dep-12", "commit_message": message}}));

    let embed = render(&info);
    let field = embed.fields.iter().find(|f| f.name == "Commit Message").expect("field");
    assert_eq!(field.value.chars().count(), 200);
    assert!(field.value.ends_with("..."));
    assert!(!field.inline);
}

#[test]
fn short_commit_message_passes_through() {
    let message = "m".repeat(150);
    let info = normalize(&json!({"deployment": {"id": "dep-13", "commit_message": message}}));

    let embed = render(&info);
    let field = embed.fields.iter().find(|f| f.name == "Commit Message").expect("field");
    assert_eq!(field.value.chars().count(), 150);
}

#[test]
fn error_details_only_render_on_failure() {
    let info = normalize(&json!({
        "deployment": {"id": "dep-14", "status": "success", "error": "stale error"}
    }));
    let embed = render(&info);
    assert!(embed.fields.iter().all(|f| f.name != "Error Details"));
}

#[test]
fn structured_error_is_rendered_as_json_block() {
    let info = normalize(&json!({
        "deployment": {
            "id": "dep-15",
            "status": "failure",
            "error": {"code": 8000000, "stage": "build"}
        }
    }));

    let embed = render(&info);
    let field = embed.fields.iter().find(|f| f.name == "Error Details").expect("field");
    assert!(field.value.starts_with("```"));
    assert!(field.value.contains("8000000"));
    assert!(!field.inline);
}

#[test]
fn oversized_error_is_cut_to_one_thousand_chars() {
    let error = "e".repeat(4000);
    let info = normalize(&json!({
        "deployment": {"id": "dep-16", "status": "failure", "error": error}
    }));

    let embed = render(&info);
    let field = embed.fields.iter().find(|f| f.name == "Error Details").expect("field");
    let inner = field.value.trim_matches('`').trim();
    assert_eq!(inner.chars().count(), 1000);
}

#[test]
fn rendering_is_deterministic() {
    let info = normalize(&json!({
        "deployment": {"id": "dep-17", "status": "success", "commit_hash": "abc123"}
    }));
    assert_eq!(render(&info), render(&info));
}
