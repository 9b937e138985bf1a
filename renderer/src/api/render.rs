use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use warp::{Rejection, Reply};

use crate::cache::RenderCache;
use crate::citations::render::{render_message, RenderOptions};
use crate::metrics;
use crate::models::{RenderRequest, RenderResponse, Source};

pub async fn handle_render(
    request: RenderRequest,
    options: Arc<RenderOptions>,
    cache: Arc<RenderCache>,
) -> Result<impl Reply, Rejection> {
    let request_id = Uuid::new_v4();
    info!(
        "Rendering message {} [{}] with {} tool calls",
        request.message.id,
        request_id,
        request.tool_calls.len()
    );

    let all_sources = request.all_sources.map(usable_conversation_sources);
    let conversation_sources = all_sources.as_deref();
    let key = RenderCache::fingerprint(&request.message, &request.tool_calls, conversation_sources);
    let (rendered, cache_hit) = cache.get_or_render(key, || {
        render_message(&request.message, &request.tool_calls, conversation_sources, &options)
    });

    let listed_references = rendered.is_final_report && !rendered.cited_sources.is_empty();
    metrics::record_render(
        request.message.message_type,
        rendered.source_origin,
        listed_references,
        cache_hit,
    );
    debug!(
        %request_id,
        origin = rendered.source_origin.as_str(),
        sources = rendered.sources.len(),
        cited = rendered.cited_sources.len(),
        final_report = rendered.is_final_report,
        cache_hit,
        cached = cache.len(),
        "Render complete"
    );

    Ok(warp::reply::json(&RenderResponse {
        request_id,
        rendered_at: Utc::now(),
        is_final_report: rendered.is_final_report,
        source_origin: rendered.source_origin,
        sources: rendered.sources,
        cited_sources: rendered.cited_sources,
        content: rendered.content,
    }))
}

/// Drops entries a citation marker can never resolve to: index 0, and every
/// repeat of an index after its first occurrence.
fn usable_conversation_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| {
            if source.index == 0 {
                debug!(title = %source.title, url = %source.url, "Dropping all_sources entry with index 0");
                return false;
            }
            if !seen.insert(source.index) {
                debug!(
                    index = source.index,
                    url = %source.url,
                    "Dropping repeated all_sources index"
                );
                return false;
            }
            true
        })
        .collect()
}
