//! Link extraction from markdown text.

use std::sync::LazyLock;

use regex::Regex;

/// The prefix of a relative link target that escapes its containing folder.
pub const UPWARD_MARKER: &str = "../";

static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("this must never fail"));

/// Extract the targets of inline `[label](target)` links that start with
/// [`UPWARD_MARKER`].
///
/// Targets are returned as written, in document order, with duplicates
/// preserved. Same-folder, absolute and URL targets are skipped.
#[must_use]
pub fn upward_references(content: &str) -> Vec<&str> {
    INLINE_LINK
        .captures_iter(content)
        .filter_map(|captures| captures.get(2))
        .map(|target| target.as_str())
        .filter(|target| target.starts_with(UPWARD_MARKER))
        .collect()
}
