// Textual source parser: fallback when no tool result produced sources

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::markers::parse_index;
use crate::models::Source;

// `1. **《Title》** - https://...` or `1. [Title] - https://...`
static NUMBERED_TITLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\.\s*\*?\*?[《\[]([^》\]]+)[》\]]\*?\*?\s*-\s*(https?://\S+)").unwrap()
});

// `[1] [Title](url)`
static NUMBERED_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]+)\]\s*\[([^\]]+)\]\(([^)]+)\)").unwrap());

// `| [1] | Title | [Link](url) |` or `| 1 | Title | url |`
static TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|\s*\[?([0-9]+)\]?\s*\|\s*([^|]+)\s*\|\s*(?:\[([^\]]*)\]\()?([^)|]+)\)?").unwrap()
});

// Lossy: would also eat a `)` or `|` that belongs to the url.
static TABLE_URL_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)?\s*\|?$").unwrap());

// `- [Title](url)`
static LINK_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*\[([^\]]+)\]\(([^)]+)\)").unwrap());

type NumberedMatcher = fn(&str) -> Vec<Source>;

/// Numbered families, highest priority first.
const NUMBERED_MATCHERS: [NumberedMatcher; 3] = [numbered_title_url, numbered_links, table_rows];

/// Recovers sources from reference lists the model wrote into the text.
///
/// The numbered families are merged in priority order; an index claimed by an
/// earlier match is never overwritten. Unnumbered link lists are consulted
/// only when no numbered family matched anything.
pub fn parse_sources(content: &str) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();

    for matcher in NUMBERED_MATCHERS {
        for candidate in matcher(content) {
            if !sources.iter().any(|s| s.index == candidate.index) {
                sources.push(candidate);
            }
        }
    }

    if sources.is_empty() {
        return link_list_items(content);
    }
    sources
}

fn numbered_source(index: &str, title: &str, url: &str) -> Option<Source> {
    let index = parse_index(index)?;
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }
    Some(Source::new(index, title, url))
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str())
}

pub fn numbered_title_url(content: &str) -> Vec<Source> {
    NUMBERED_TITLE_URL
        .captures_iter(content)
        .filter_map(|caps| numbered_source(group(&caps, 1)?, group(&caps, 2)?, group(&caps, 3)?))
        .collect()
}

pub fn numbered_links(content: &str) -> Vec<Source> {
    NUMBERED_LINK
        .captures_iter(content)
        .filter_map(|caps| numbered_source(group(&caps, 1)?, group(&caps, 2)?, group(&caps, 3)?))
        .collect()
}

pub fn table_rows(content: &str) -> Vec<Source> {
    TABLE_ROW
        .captures_iter(content)
        .filter_map(|caps| {
            let url = TABLE_URL_TAIL.replace(group(&caps, 4)?.trim(), "");
            numbered_source(group(&caps, 1)?, group(&caps, 2)?, &url)
        })
        .collect()
}

/// Unnumbered `- [Title](url)` items, numbered 1.. in document order.
pub fn link_list_items(content: &str) -> Vec<Source> {
    let mut next_index: u32 = 1;
    let mut sources = Vec::new();
    for caps in LINK_LIST_ITEM.captures_iter(content) {
        let (Some(title), Some(url)) = (group(&caps, 1), group(&caps, 2)) else {
            continue;
        };
        if title.is_empty() || url.is_empty() {
            continue;
        }
        sources.push(Source::new(next_index, title, url));
        next_index += 1;
    }
    sources
}
