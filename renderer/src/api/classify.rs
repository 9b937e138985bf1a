use std::sync::Arc;

use warp::{Rejection, Reply};

use crate::citations::classifier::assess;
use crate::citations::render::RenderOptions;
use crate::models::{ClassifyResponse, ContentRequest};

pub async fn handle_classify(
    request: ContentRequest,
    options: Arc<RenderOptions>,
) -> Result<impl Reply, Rejection> {
    let assessment = assess(&request.content, &options.thresholds);
    Ok(warp::reply::json(&ClassifyResponse {
        is_final_report: assessment.is_final_report,
        length: assessment.length,
        citation_count: assessment.citation_count,
    }))
}
