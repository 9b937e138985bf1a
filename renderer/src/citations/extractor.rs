// Tool-result extractor: trusted sources from Confluence tool output

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::ToolResultError;
use crate::models::{Source, SourceKind, ToolCall};

pub const CONFLUENCE_GET_PAGE: &str = "confluence_get_page";
pub const CONFLUENCE_SEARCH: &str = "confluence_search";

/// The tools whose results carry source metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTool {
    /// `{"metadata": {"url", "title", "type"?}, ...}`
    GetPage,
    /// `[{"url", "title", "type"?}, ...]`
    Search,
}

impl SourceTool {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            CONFLUENCE_GET_PAGE => Some(SourceTool::GetPage),
            CONFLUENCE_SEARCH => Some(SourceTool::Search),
            _ => None,
        }
    }
}

/// A validated `{url, title}` object from a tool result, not yet numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub url: String,
    pub title: String,
    pub kind: Option<SourceKind>,
}

impl SourceCandidate {
    pub fn validate(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let url = object.get("url")?.as_str()?;
        let title = object.get("title")?.as_str()?;
        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .and_then(SourceKind::from_tag);
        Some(Self {
            url: url.to_string(),
            title: title.to_string(),
            kind,
        })
    }

    fn into_source(self, index: u32) -> Source {
        Source {
            index,
            title: self.title,
            url: self.url,
            kind: self.kind,
        }
    }
}

/// Parses and validates one tool call's result.
///
/// A search result keeps its valid entries and silently drops the rest; a
/// page result with unusable metadata is an error.
pub fn candidates(call: &ToolCall) -> Result<Vec<SourceCandidate>, ToolResultError> {
    let tool = SourceTool::from_name(&call.name)
        .ok_or_else(|| ToolResultError::UnsupportedTool(call.name.clone()))?;
    let raw = call
        .result
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .ok_or(ToolResultError::EmptyResult)?;
    let value: Value = serde_json::from_str(raw)?;

    match tool {
        SourceTool::GetPage => {
            let metadata = value
                .get("metadata")
                .ok_or(ToolResultError::UnexpectedShape("page result has no metadata"))?;
            let candidate = SourceCandidate::validate(metadata).ok_or(
                ToolResultError::UnexpectedShape("page metadata lacks a string url and title"),
            )?;
            Ok(vec![candidate])
        }
        SourceTool::Search => {
            let items = value
                .as_array()
                .ok_or(ToolResultError::UnexpectedShape("search result is not an array"))?;
            Ok(items.iter().filter_map(SourceCandidate::validate).collect())
        }
    }
}

/// Extracts sources from tool calls in encounter order.
///
/// Indices start at 1 and are shared across the whole list, as is the url
/// dedup set. Passing every tool call of a conversation yields the
/// conversation-wide source list.
pub fn extract_sources(tool_calls: &[ToolCall]) -> Vec<Source> {
    let mut sources = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut next_index: u32 = 1;

    for call in tool_calls {
        let found = match candidates(call) {
            Ok(found) => found,
            Err(ToolResultError::UnsupportedTool(_)) | Err(ToolResultError::EmptyResult) => continue,
            Err(err) => {
                debug!(
                    tool_call_id = %call.id,
                    tool = %call.name,
                    reason = err.reason(),
                    "Tool result contributed no sources: {}",
                    err
                );
                continue;
            }
        };

        for candidate in found {
            if seen_urls.insert(candidate.url.clone()) {
                sources.push(candidate.into_source(next_index));
                next_index += 1;
            }
        }
    }

    sources
}
