//! Text helpers for scraped content and console previews.

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// ```text
/// "  binary \n\t search  "  →  "binary search"
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return the first `max_chars` characters of `s`.
///
/// Counts chars rather than bytes so multi-byte text is never split.
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate to `max_chars` characters, appending `suffix` only when something was cut.
pub fn preview(s: &str, max_chars: usize, suffix: &str) -> String {
    let head = take_chars(s, max_chars);
    if head.len() == s.len() {
        s.to_owned()
    } else {
        format!("{head}{suffix}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
