//! Plain-text helpers shared by the item and social pipelines.
//!
//! Feed summaries arrive as HTML fragments of wildly varying quality. Everything
//! here turns them into short single-line plain text:
//! - [`strip_markup`]: drop tags, decode entities, collapse whitespace
//! - [`summarize`]: strip and bound to [`SUMMARY_MAX_CHARS`] characters
//! - [`estimate_read_minutes`]: word-count based reading time

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Upper bound on a summary, ellipsis included.
pub const SUMMARY_MAX_CHARS: usize = 280;

/// Average reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: f64 = 200.0;

const ELLIPSIS: char = '…';

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Strip all markup from an HTML fragment.
///
/// Text nodes are joined with a space so that adjacent block elements do not
/// run together, then every run of whitespace (newlines included) collapses
/// to a single space. Entities are decoded by the HTML parser.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_markup("<p>Hello</p>\n<p>world &amp; co</p>"), "Hello world & co");
/// ```
pub fn strip_markup(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let joined = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&joined)
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Produce the bounded plain-text summary for a raw summary fragment.
pub fn summarize(raw: &str) -> String {
    truncate_chars(&strip_markup(raw), SUMMARY_MAX_CHARS)
}

/// Truncate to at most `max` characters, replacing the tail with `…`.
///
/// Counts `char`s, never bytes, so multi-byte text is never split. Text
/// already within the limit is returned unchanged.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

/// Number of `\w+` tokens in the text.
pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Estimated reading time in whole minutes, never less than one.
///
/// Half-minute ties round to the even neighbour, so 500 words reads as two
/// minutes and 700 words as four.
pub fn estimate_read_minutes(text: &str) -> u32 {
    let minutes = (word_count(text) as f64 / WORDS_PER_MINUTE).round_ties_even();
    (minutes as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_tags_and_entities() {
        assert_eq!(
            strip_markup("<p>Hello <b>big</b></p>\n\n<p>world &amp; co</p>"),
            "Hello big world & co"
        );
    }

    #[test]
    fn test_strip_markup_plain_text_passthrough() {
        assert_eq!(strip_markup("  just\ttext\n here "), "just text here");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_summarize_short_text_unchanged() {
        let text = "a".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(summarize(&text), text);
    }

    #[test]
    fn test_summarize_long_text_is_exactly_bounded() {
        let text = format!("<div>{}</div>", "word ".repeat(100));
        let summary = summarize(&text);

        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.ends_with('…'));
        assert_eq!(summary.matches('…').count(), 1);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        let text = "é".repeat(300);
        let out = truncate_chars(&text, SUMMARY_MAX_CHARS);

        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS);
        assert!(out.starts_with(&"é".repeat(279)));
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_word_count_ignores_markup_punctuation() {
        assert_eq!(word_count("Hello, world! It's 2025."), 5);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_estimate_read_minutes() {
        assert_eq!(estimate_read_minutes(""), 1);
        assert_eq!(estimate_read_minutes(&"word ".repeat(50)), 1);
        assert_eq!(estimate_read_minutes(&"word ".repeat(300)), 2);
        assert_eq!(estimate_read_minutes(&"word ".repeat(500)), 2);
        assert_eq!(estimate_read_minutes(&"word ".repeat(700)), 4);
        assert_eq!(estimate_read_minutes(&"word ".repeat(1300)), 6);
    }
}
