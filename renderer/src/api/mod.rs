use std::convert::Infallible;
use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::cache::RenderCache;
use crate::citations::render::RenderOptions;

mod classify;
mod render;
mod sources;

pub fn routes(
    options: Arc<RenderOptions>,
    cache: Arc<RenderCache>,
    max_body_bytes: u64,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));

    let render_route = api
        .and(warp::path("render"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and(with_options(options.clone()))
        .and(with_cache(cache))
        .and_then(render::handle_render);

    let sources_route = api
        .and(warp::path("sources"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and_then(sources::handle_extract_sources);

    let parse_route = api
        .and(warp::path("sources"))
        .and(warp::path("parse"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and_then(sources::handle_parse_sources);

    let classify_route = api
        .and(warp::path("classify"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and(with_options(options))
        .and_then(classify::handle_classify);

    render_route
        .or(sources_route)
        .or(parse_route)
        .or(classify_route)
}

fn with_options(
    options: Arc<RenderOptions>,
) -> impl Filter<Extract = (Arc<RenderOptions>,), Error = Infallible> + Clone {
    warp::any().map(move || options.clone())
}

fn with_cache(
    cache: Arc<RenderCache>,
) -> impl Filter<Extract = (Arc<RenderCache>,), Error = Infallible> + Clone {
    warp::any().map(move || cache.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::handle_rejection;
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    fn api() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        routes(
            Arc::new(RenderOptions::default()),
            Arc::new(RenderCache::new(16)),
            64 * 1024,
        )
        .recover(handle_rejection)
    }

    fn search_result() -> Value {
        json!({
            "id": "call-1",
            "name": "confluence_search",
            "args": {"query": "deploy"},
            "result": json!([
                {"url": "https://wiki/1", "title": "One", "type": "page"},
                {"url": "https://wiki/2", "title": "Two"},
                {"url": "https://wiki/3", "title": "Three"}
            ]).to_string(),
            "status": "completed"
        })
    }

    fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn render_final_report_end_to_end() {
        let content = format!(
            "Rollout uses canaries [1] and is reversible [3] [3].\n\n{}",
            "Further detail on the rollout process. ".repeat(15)
        );
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .json(&json!({
                "message": {"id": "m1", "type": "ai", "content": content},
                "tool_calls": [search_result()]
            }))
            .reply(&api())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp.body());
        assert_eq!(body["is_final_report"], true);
        assert_eq!(body["source_origin"], "tool_results");
        assert_eq!(body["sources"].as_array().unwrap().len(), 3);
        assert_eq!(body["sources"][0]["type"], "page");
        let cited: Vec<u64> = body["cited_sources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["index"].as_u64().unwrap())
            .collect();
        assert_eq!(cited, vec![1, 3]);
        let rendered = body["content"].as_str().unwrap();
        assert!(rendered.contains(r#"class="citation" title="One">1</a>"#));
        assert!(rendered.ends_with("- [1] [One](https://wiki/1)\n- [3] [Three](https://wiki/3)"));
    }

    #[tokio::test]
    async fn repeated_render_is_identical() {
        let filter = api();
        let request = json!({
            "message": {"id": "m2", "type": "assistant", "content": "Short [2]."},
            "tool_calls": [search_result()]
        });

        let first = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .json(&request)
            .reply(&filter)
            .await;
        let second = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .json(&request)
            .reply(&filter)
            .await;

        let first = body_json(first.body());
        let second = body_json(second.body());
        assert_eq!(first["content"], second["content"]);
        assert_eq!(first["cited_sources"], second["cited_sources"]);
        assert_ne!(first["request_id"], second["request_id"]);
    }

    #[tokio::test]
    async fn render_drops_unusable_conversation_sources() {
        let content = format!(
            "Canaries [1], rollback [2] and alerts [2].\n\n{}",
            "Further detail on the rollout process. ".repeat(15)
        );
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .json(&json!({
                "message": {"id": "m3", "type": "ai", "content": content},
                "all_sources": [
                    {"index": 0, "title": "Bad", "url": "https://bad"},
                    {"index": 1, "title": "One", "url": "https://wiki/1"},
                    {"index": 1, "title": "Shadow", "url": "https://wiki/shadow"},
                    {"index": 2, "title": "Two", "url": "https://wiki/2"}
                ]
            }))
            .reply(&api())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp.body());
        assert_eq!(body["source_origin"], "conversation");
        let urls: Vec<&str> = body["sources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://wiki/1", "https://wiki/2"]);
        let rendered = body["content"].as_str().unwrap();
        assert!(!rendered.contains("https://bad"));
        assert!(!rendered.contains("https://wiki/shadow"));
    }

    #[tokio::test]
    async fn short_message_ignores_repeated_conversation_indices() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .json(&json!({
                "message": {"id": "m4", "type": "ai", "content": "Short answer [1]."},
                "all_sources": [
                    {"index": 1, "title": "One", "url": "https://wiki/1"},
                    {"index": 1, "title": "Again", "url": "https://wiki/again"}
                ]
            }))
            .reply(&api())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp.body());
        assert_eq!(body["is_final_report"], false);
        assert_eq!(body["content"], "Short answer [1].");
    }

    #[tokio::test]
    async fn render_rejects_malformed_body() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/render")
            .header("content-type", "application/json")
            .body(r#"{"message": "not an object"}"#)
            .reply(&api())
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn extract_sources_accumulates_across_tool_calls() {
        let page = json!({
            "id": "call-0",
            "name": "confluence_get_page",
            "args": {},
            "result": json!({"metadata": {"url": "https://wiki/2", "title": "Two"}}).to_string(),
            "status": "completed"
        });
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/sources")
            .json(&json!({"tool_calls": [page, search_result()]}))
            .reply(&api())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp.body());
        let urls: Vec<&str> = body["sources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://wiki/2", "https://wiki/1", "https://wiki/3"]);
    }

    #[tokio::test]
    async fn parse_sources_from_text() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/sources/parse")
            .json(&json!({"content": "[1] [Guide](https://wiki/guide)"}))
            .reply(&api())
            .await;

        let body = body_json(resp.body());
        assert_eq!(body["sources"][0]["index"], 1);
        assert_eq!(body["sources"][0]["url"], "https://wiki/guide");
    }

    #[tokio::test]
    async fn classify_reports_measurements() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/classify")
            .json(&json!({"content": "tiny [1]"}))
            .reply(&api())
            .await;

        let body = body_json(resp.body());
        assert_eq!(body["is_final_report"], false);
        assert_eq!(body["length"], 8);
        assert_eq!(body["citation_count"], 1);
    }
}
