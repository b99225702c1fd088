//! Package name normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Name used when normalization leaves nothing.
pub const FALLBACK_PACKAGE_NAME: &str = "app";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-.]").expect("invalid package-name regex"));

static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("invalid hyphen regex"));

/// Normalizes a display name into a valid Linux package name.
///
/// Lower-cases, replaces anything outside `[a-z0-9-.]` with `-`, collapses
/// hyphen runs and trims hyphens from both ends. Idempotent.
///
/// # Examples
///
/// ```
/// use pyforge::package::normalize_package_name;
///
/// assert_eq!(normalize_package_name("My Cool/App"), "my-cool-app");
/// assert_eq!(normalize_package_name("***"), "app");
/// ```
pub fn normalize_package_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = DISALLOWED.replace_all(&lowered, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        FALLBACK_PACKAGE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
