use warp::cors::Builder;

/// Browser access for the conversation view. An empty origin list allows any
/// origin; otherwise only the listed ones may call the API.
pub fn cors(allowed_origins: &[String]) -> Builder {
    let builder = warp::cors()
        .allow_headers(vec!["Content-Type", "Accept", "Content-Length", "Origin"])
        .allow_methods(vec!["POST", "GET", "OPTIONS"]);

    if allowed_origins.is_empty() {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(allowed_origins.iter().map(String::as_str))
    }
}
