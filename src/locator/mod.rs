use regex::RegexBuilder;
use tracing::debug;

use crate::utils::floor_char_boundary;

/// A resolved match in the document, as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// How far past the anchor the full pattern is retried, in bytes.
const ANCHOR_WINDOW: usize = 500;

/// Maximum number of leading tokens used to build the anchor pattern.
const ANCHOR_TOKENS: usize = 3;

/// Find the best-matching span for `needle` inside `document`.
///
/// Strategies in order of decreasing precision, first match wins:
/// 1. Exact substring search (case-sensitive).
/// 2. Whitespace-tolerant search: whitespace runs in the needle match any
///    whitespace run in the document, case-insensitively. Recovers matches
///    where a copy/paste normalized line breaks or collapsed spaces.
/// 3. Anchor on the needle's first few tokens, retry the full pattern in a
///    bounded window past the anchor, and failing that return the anchor
///    match itself.
///
/// Tolerant matching trades precision for recall and can land on a
/// case-folded or truncated match; callers treat `None` as "no-op, warn the
/// user", never as a fatal condition.
pub fn locate(document: &str, needle: &str) -> Option<Span> {
    if needle.trim().is_empty() || needle.len() > document.len() {
        return None;
    }

    if let Some(start) = document.find(needle) {
        return Some(Span {
            start,
            end: start + needle.len(),
        });
    }

    let tokens: Vec<&str> = needle.split_whitespace().collect();
    let pattern = tokens_pattern(&tokens);
    if let Some(span) = find_pattern(document, &pattern) {
        debug!(start = span.start, "matched via whitespace-tolerant search");
        return Some(span);
    }

    let anchor_pattern = tokens_pattern(&tokens[..tokens.len().min(ANCHOR_TOKENS)]);
    let anchor = find_pattern(document, &anchor_pattern)?;

    let window_end = floor_char_boundary(
        document,
        (anchor.start + ANCHOR_WINDOW).min(document.len()),
    );
    if let Some(m) = find_pattern(&document[anchor.start..window_end], &pattern) {
        return Some(Span {
            start: anchor.start + m.start,
            end: anchor.start + m.end,
        });
    }

    debug!(
        start = anchor.start,
        "full snippet not recovered, falling back to anchor match"
    );
    Some(anchor)
}

/// Literal-match pattern for the tokens, with `\s+` between them.
fn tokens_pattern(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// First case-insensitive match of `pattern` in `haystack`.
fn find_pattern(haystack: &str, pattern: &str) -> Option<Span> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(haystack).map(|m| Span {
        start: m.start(),
        end: m.end(),
    })
}
