//! Shared text utility functions.

use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("ANSI escape pattern is valid")
});

/// Marker inserted where the middle of a long text was dropped.
pub const ELISION_MARKER: &str = "\n[... truncated ...]\n";

/// Remove ANSI CSI escape sequences (colors, cursor movement).
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// Number of characters (not bytes) in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `n` characters of `s`.
pub fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last `n` characters of `s`.
pub fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Keep the first `head` and last `tail` characters, joined by [`ELISION_MARKER`].
///
/// Text of at most `max_chars` characters is returned verbatim.
pub fn elide_middle(s: &str, max_chars: usize, head: usize, tail: usize) -> String {
    if char_len(s) <= max_chars {
        return s.to_string();
    }
    format!("{}{}{}", head_chars(s, head), ELISION_MARKER, tail_chars(s, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_removes_color_codes() {
        let colored = "\x1b[31mred\x1b[0m and \x1b[1;32mgreen\x1b[0m";
        assert_eq!(strip_ansi(colored), "red and green");
    }

    #[test]
    fn test_strip_ansi_plain_text_unchanged() {
        assert_eq!(strip_ansi("no escapes here"), "no escapes here");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn test_head_and_tail_count_chars_not_bytes() {
        let s = "éàü-abc";
        assert_eq!(head_chars(s, 2), "éà");
        assert_eq!(tail_chars(s, 3), "abc");
        assert_eq!(head_chars(s, 100), s);
        assert_eq!(tail_chars(s, 100), s);
        assert_eq!(tail_chars(s, 0), "");
    }

    #[test]
    fn test_elide_middle_keeps_head_and_tail() {
        let s = format!("{}{}", "H".repeat(900), "T".repeat(900));
        let out = elide_middle(&s, 1200, 800, 400);
        assert!(out.starts_with(&"H".repeat(800)));
        assert!(out.ends_with(&"T".repeat(400)));
        assert!(out.contains(ELISION_MARKER));
        assert_eq!(char_len(&out), 800 + 400 + char_len(ELISION_MARKER));
    }

    #[test]
    fn test_elide_middle_short_text_verbatim() {
        let s = "x".repeat(1200);
        assert_eq!(elide_middle(&s, 1200, 800, 400), s);
    }
}
