//! Sentence extraction around a matched keyword.

use regex::Regex;

/// Hard cap on the returned snippet, counting `char`s.
const MAX_SNIPPET_CHARS: usize = 300;
/// Length of the raw-content fallback when no usable span is found.
const FALLBACK_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// Extracts the sentence around the first case-insensitive occurrence of
/// `keyword` in `content`, with every in-span occurrence wrapped in
/// `**…**` emphasis markup.
///
/// The span runs from the nearest sentence delimiter (`.`, `!`, `?`,
/// newline) before the match to the nearest one after it, or the text
/// edges. Spans longer than 300 chars are truncated to 297 plus an
/// ellipsis. When the keyword does not occur, the first 200 chars of the
/// raw content (plus ellipsis if truncated) are returned instead.
#[must_use]
pub fn extract_snippet(content: &str, keyword: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }

    let pattern = format!("(?i){}", regex::escape(keyword));
    let Ok(re) = Regex::new(&pattern) else {
        return fallback(content);
    };

    let Some(m) = re.find(content) else {
        return fallback(content);
    };

    let start = scan_back_to_sentence_start(content, m.start());
    let end = scan_forward_to_sentence_end(content, m.end());

    let span = content[start..end].trim();
    if span.is_empty() {
        return fallback(content);
    }

    let highlighted = re.replace_all(span, "**$0**").into_owned();
    truncate_chars(&highlighted, MAX_SNIPPET_CHARS)
}

/// Walks backward from `from` to the char after the previous sentence
/// delimiter, or the start of the text. Returns a byte index on a char
/// boundary.
fn scan_back_to_sentence_start(content: &str, from: usize) -> usize {
    content[..from]
        .char_indices()
        .rev()
        .find(|&(_, c)| is_sentence_delimiter(c))
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Walks forward from `from` to include the next sentence delimiter, or
/// the end of the text. Returns a byte index on a char boundary.
fn scan_forward_to_sentence_end(content: &str, from: usize) -> usize {
    content[from..]
        .char_indices()
        .find(|&(_, c)| is_sentence_delimiter(c))
        .map_or(content.len(), |(i, c)| from + i + c.len_utf8())
}

fn is_sentence_delimiter(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

fn fallback(content: &str) -> String {
    truncate_at(content, FALLBACK_CHARS)
}

/// Truncates to `max` chars total, replacing the tail with an ellipsis
/// when over the limit.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Truncates to `max` chars of content plus an appended ellipsis.
fn truncate_at(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max).collect();
    format!("{kept}{ELLIPSIS}")
}
