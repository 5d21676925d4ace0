//! Text processing utilities.
//!
//! This module contains helpers for preparing result rows for display:
//! locating query matches for highlighting and truncating long names to the
//! available column width.

use log::*;
use regex::RegexBuilder;

/// Find the byte ranges of every case-insensitive occurrence of `query`
/// inside `text`. The query is taken literally (regex metacharacters in
/// names like "(OAO)" must not change the match).
///
/// # Returns
/// Non-overlapping `(start, end)` byte ranges, in order of appearance.
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() {
        return vec![];
    }
    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to compile highlight pattern for {:?}: {}", query, e);
            return vec![];
        }
    };
    re.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

/// Truncate `text` to at most `max_chars` characters, appending an ellipsis
/// when something was cut. Counts characters, not bytes, so multi-byte names
/// survive.
///
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}
