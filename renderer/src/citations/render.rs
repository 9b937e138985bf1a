// Orchestration: source selection, then sanitize -> match -> inject -> append

use serde::Serialize;

use super::classifier::{is_final_report, ReportThresholds};
use super::extractor::extract_sources;
use super::injector::inject_citation_links;
use super::matcher::{cited_indices, filter_cited, renumber};
use super::parser::parse_sources;
use super::references::{reference_block, ReferenceStyle};
use super::sanitizer::strip_generated_references;
use crate::models::{Message, MessageType, Source, SourceOrigin, ToolCall};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub thresholds: ReportThresholds,
    pub style: ReferenceStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection {
    pub origin: SourceOrigin,
    pub sources: Vec<Source>,
}

/// Picks the source list for one message.
///
/// A final report with a non-empty conversation list uses that list as is.
/// Otherwise tool results are tried first and the message text second.
pub fn select_sources(
    content: &str,
    tool_calls: &[ToolCall],
    conversation_sources: Option<&[Source]>,
    final_report: bool,
) -> SourceSelection {
    if final_report {
        if let Some(all) = conversation_sources.filter(|all| !all.is_empty()) {
            return SourceSelection {
                origin: SourceOrigin::Conversation,
                sources: all.to_vec(),
            };
        }
    }

    let extracted = extract_sources(tool_calls);
    if !extracted.is_empty() {
        return SourceSelection {
            origin: SourceOrigin::ToolResults,
            sources: extracted,
        };
    }

    let parsed = parse_sources(content);
    if !parsed.is_empty() {
        return SourceSelection {
            origin: SourceOrigin::MessageText,
            sources: parsed,
        };
    }

    SourceSelection {
        origin: SourceOrigin::None,
        sources: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    pub content: String,
    pub cited_sources: Vec<Source>,
}

/// Runs the citation stages over a body.
///
/// Sanitizing comes first so a made-up reference section can neither add
/// cited indices nor keep links pointing into text that is removed. Links
/// resolve against all `sources`; the appended list holds only cited ones.
pub fn process_content(
    content: &str,
    sources: &[Source],
    show_sources_list: bool,
    style: &ReferenceStyle,
) -> ProcessedContent {
    if sources.is_empty() {
        return ProcessedContent {
            content: content.to_string(),
            cited_sources: Vec::new(),
        };
    }

    let sanitized = strip_generated_references(content);
    let cited = cited_indices(&sanitized);
    let cited_sources = renumber(filter_cited(sources, &cited));

    let mut result = inject_citation_links(&sanitized, sources);
    if show_sources_list && !cited_sources.is_empty() {
        result.push_str(&reference_block(&cited_sources, style));
    }

    ProcessedContent {
        content: result,
        cited_sources,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub is_final_report: bool,
    pub source_origin: SourceOrigin,
    pub sources: Vec<Source>,
    pub cited_sources: Vec<Source>,
    pub content: String,
}

/// Derives everything the conversation view shows for one message.
/// Human messages are passed through untouched.
pub fn render_message(
    message: &Message,
    tool_calls: &[ToolCall],
    conversation_sources: Option<&[Source]>,
    options: &RenderOptions,
) -> RenderedMessage {
    let final_report = is_final_report(&message.content, &options.thresholds);

    if message.message_type == MessageType::Human {
        return RenderedMessage {
            is_final_report: final_report,
            source_origin: SourceOrigin::None,
            sources: Vec::new(),
            cited_sources: Vec::new(),
            content: message.content.clone(),
        };
    }

    let selection = select_sources(&message.content, tool_calls, conversation_sources, final_report);
    let processed = process_content(
        &message.content,
        &selection.sources,
        final_report,
        &options.style,
    );

    RenderedMessage {
        is_final_report: final_report,
        source_origin: selection.origin,
        sources: selection.sources,
        cited_sources: processed.cited_sources,
        content: processed.content,
    }
}
