use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([0-9]+)\]").unwrap());

/// A `[n]` occurrence in body text that is not part of a markdown link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMarker {
    pub range: Range<usize>,
    /// `None` when the digits are zero or overflow `u32`; such a marker cites nothing.
    pub index: Option<u32>,
}

/// Parses a captured digit run into a source index. Zero is not a valid index.
pub fn parse_index(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|index| *index > 0)
}

/// Counts every literal `[digits]` token, link text included.
pub fn count_bracketed_integers(text: &str) -> usize {
    BRACKETED_INTEGER.find_iter(text).count()
}

/// Yields citation markers in document order.
///
/// A bracketed integer is skipped when it is followed directly by `(`, or when
/// the text after it reaches a `](` before any other `]`. The second rule also
/// swallows a real citation that precedes a markdown link on the same run of
/// text (`[1] see [docs](url)`, `[1][2](url)`); that is a known limitation.
pub fn citation_markers(text: &str) -> impl Iterator<Item = CitationMarker> + '_ {
    BRACKETED_INTEGER.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        if is_link_text(&text[whole.end()..]) {
            return None;
        }
        let digits = caps.get(1)?.as_str();
        Some(CitationMarker {
            range: whole.range(),
            index: parse_index(digits),
        })
    })
}

fn is_link_text(rest: &str) -> bool {
    if rest.starts_with('(') {
        return true;
    }
    match rest.find(']') {
        Some(pos) => rest[pos + 1..].starts_with('('),
        None => false,
    }
}
