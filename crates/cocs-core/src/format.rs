//! Display formatting helpers for notification rendering.

/// Truncates a commit hash to its first 7 characters.
///
/// Returns the literal `"unknown"` placeholder when the hash is empty,
/// so callers always have something printable.
pub fn short_hash(hash: &str) -> String {
    if hash.is_empty() {
        return "unknown".to_string();
    }
    hash.chars().take(7).collect()
}

/// Renders a build duration in seconds as a compact human string.
///
/// Under a minute renders as `"{n}s"` rounded to the nearest integer;
/// sixty seconds or more renders as `"{m}m"` or `"{m}m {s}s"`.
///
/// `None` and zero both render `"N/A"`; a genuine zero-second build is
/// indistinguishable from an absent value.
pub fn format_duration(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s != 0.0 && s.is_finite() => s,
        _ => return "N/A".to_string(),
    };

    if secs < 60.0 {
        return format!("{}s", secs.round());
    }

    let minutes = (secs / 60.0).floor();
    let remainder = (secs % 60.0).round();
    if remainder == 0.0 {
        format!("{minutes}m")
    } else {
        format!("{minutes}m {remainder}s")
    }
}

/// Builds a GitHub commit URL from repository coordinates and a hash.
///
/// Returns an empty string when the hash is empty, which the renderer
/// treats as "no link available".
pub fn commit_url(owner: &str, repo: &str, hash: &str) -> String {
    if hash.is_empty() {
        return String::new();
    }
    format!("https://github.com/{owner}/{repo}/commit/{hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_truncates_to_seven() {
        assert_eq!(short_hash("abcdef1234"), "abcdef1");
    }

    #[test]
    fn short_hash_passes_through_short_input() {
        assert_eq!(short_hash("abc"), "abc");
    }

    #[test]
    fn short_hash_empty_is_unknown() {
        assert_eq!(short_hash(""), "unknown");
    }

    #[test]
    fn duration_under_a_minute_rounds() {
        assert_eq!(format_duration(Some(5.7)), "6s");
        assert_eq!(format_duration(Some(59.0)), "59s");
    }

    #[test]
    fn duration_with_remainder() {
        assert_eq!(format_duration(Some(65.0)), "1m 5s");
    }

    #[test]
    fn duration_on_exact_minute() {
        assert_eq!(format_duration(Some(120.0)), "2m");
    }

    #[test]
    fn duration_zero_and_none_are_not_available() {
        assert_eq!(format_duration(Some(0.0)), "N/A");
        assert_eq!(format_duration(None), "N/A");
    }

    #[test]
    fn commit_url_uses_repo_coordinates() {
        assert_eq!(
            commit_url("cocs-project", "cocs", "abcdef1234"),
            "https://github.com/cocs-project/cocs/commit/abcdef1234"
        );
    }

    #[test]
    fn commit_url_empty_hash_yields_empty() {
        assert_eq!(commit_url("cocs-project", "cocs", ""), "");
    }
}
