use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::models::{MessageType, SourceOrigin};

static MESSAGES_RENDERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "citation_renderer_messages_rendered_total",
        "Total number of messages rendered, by message type.",
        &["message_type"]
    )
    .unwrap()
});

static RENDER_CACHE_HITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "citation_renderer_cache_hits_total",
        "Total number of renders served from the render cache."
    )
    .unwrap()
});

static SOURCE_SELECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "citation_renderer_source_selections_total",
        "Total number of renders, by where their source list came from.",
        &["origin"]
    )
    .unwrap()
});

static REFERENCE_LISTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "citation_renderer_reference_lists_total",
        "Total number of rendered final reports that listed at least one cited source."
    )
    .unwrap()
});

/// Registers every metric so `/metrics` is complete before the first render.
pub fn init() {
    Lazy::force(&MESSAGES_RENDERED_TOTAL);
    Lazy::force(&RENDER_CACHE_HITS_TOTAL);
    Lazy::force(&SOURCE_SELECTIONS_TOTAL);
    Lazy::force(&REFERENCE_LISTS_TOTAL);
}

pub fn record_render(
    message_type: MessageType,
    origin: SourceOrigin,
    listed_references: bool,
    cache_hit: bool,
) {
    let message_type = match message_type {
        MessageType::Human => "human",
        MessageType::Assistant => "assistant",
    };
    MESSAGES_RENDERED_TOTAL
        .with_label_values(&[message_type])
        .inc();
    SOURCE_SELECTIONS_TOTAL
        .with_label_values(&[origin.as_str()])
        .inc();
    if listed_references {
        REFERENCE_LISTS_TOTAL.inc();
    }
    if cache_hit {
        RENDER_CACHE_HITS_TOTAL.inc();
    }
}

/// Prometheus text exposition of the default registry.
pub fn gather() -> Result<(Vec<u8>, String), prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok((buffer, encoder.format_type().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_contains_registered_metrics() {
        init();
        record_render(MessageType::Assistant, SourceOrigin::ToolResults, true, false);
        let (body, content_type) = gather().unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(text.contains("citation_renderer_messages_rendered_total"));
        assert!(text.contains("origin=\"tool_results\""));
    }
}
