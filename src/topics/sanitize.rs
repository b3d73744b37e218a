//! Candidate topic normalization into GitHub's accepted tag syntax.

use once_cell::sync::Lazy;
use regex::Regex;

/// GitHub rejects topic names longer than this.
pub const MAX_TOPIC_LEN: usize = 35;

/// GitHub stores at most this many topics per repository.
pub const MAX_TOPICS: usize = 20;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

/// Normalize candidate topics into valid GitHub topic names.
///
/// Lowercases, replaces spaces with hyphens, strips everything outside
/// `[a-z0-9-]`, drops entries that end up empty or over-length, and truncates
/// to the first [`MAX_TOPICS`] survivors. Relative order is preserved and
/// duplicates pass through untouched.
pub fn sanitize_topics(candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .map(|raw| {
            let lowered = raw.trim().to_lowercase().replace(' ', "-");
            INVALID_CHARS.replace_all(&lowered, "").into_owned()
        })
        .filter(|topic| !topic.is_empty() && topic.len() <= MAX_TOPIC_LEN)
        .take(MAX_TOPICS)
        .collect()
}
