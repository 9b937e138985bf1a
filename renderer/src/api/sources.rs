use tracing::info;
use warp::{Rejection, Reply};

use crate::citations::extractor::extract_sources;
use crate::citations::parser::parse_sources;
use crate::models::{ContentRequest, SourcesRequest, SourcesResponse};

pub async fn handle_extract_sources(request: SourcesRequest) -> Result<impl Reply, Rejection> {
    let sources = extract_sources(&request.tool_calls);
    info!(
        "Extracted {} sources from {} tool calls",
        sources.len(),
        request.tool_calls.len()
    );
    Ok(warp::reply::json(&SourcesResponse { sources }))
}

pub async fn handle_parse_sources(request: ContentRequest) -> Result<impl Reply, Rejection> {
    let sources = parse_sources(&request.content);
    info!("Parsed {} sources from message text", sources.len());
    Ok(warp::reply::json(&SourcesResponse { sources }))
}
