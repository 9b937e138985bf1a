use std::sync::Arc;

use tracing::{error, info};
use warp::Filter;

mod api;
mod cache;
mod citations;
mod config;
mod error;
mod metrics;
mod middleware;
mod models;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting citation renderer");
    info!(
        "Final report thresholds: {} characters, {} citations",
        config.final_report_min_length, config.final_report_min_citations
    );

    metrics::init();

    let options = Arc::new(config.render_options());
    let allowed_origins = config.allowed_origins();
    let cache = Arc::new(cache::RenderCache::new(config.cache_capacity));
    info!("Render cache capacity: {}", config.cache_capacity);

    // Build API routes
    let api_routes = api::routes(options, cache, config.max_body_bytes);

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics = warp::path("metrics")
        .and(warp::get())
        .map(|| match metrics::gather() {
            Ok((buffer, content_type)) => warp::reply::with_status(
                warp::reply::with_header(buffer, "Content-Type", content_type),
                warp::http::StatusCode::OK,
            ),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                warp::reply::with_status(
                    warp::reply::with_header(Vec::new(), "Content-Type", String::from("text/plain")),
                    warp::http::StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        });

    let routes = health
        .or(metrics)
        .or(api_routes)
        .recover(error::handle_rejection)
        .with(warp::log("api"))
        .with(middleware::cors(&allowed_origins));

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes)
        .run(addr)
        .await;

    Ok(())
}
