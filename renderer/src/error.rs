use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// Why a tool call contributed no sources. Never leaves the extractor.
#[derive(Error, Debug)]
pub enum ToolResultError {
    #[error("tool `{0}` does not produce sources")]
    UnsupportedTool(String),

    #[error("tool result is empty")]
    EmptyResult,

    #[error("tool result is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected result shape: {0}")]
    UnexpectedShape(&'static str),
}

impl ToolResultError {
    /// Short label for the rejection reason, logged as the `reason` field.
    pub fn reason(&self) -> &'static str {
        match self {
            ToolResultError::UnsupportedTool(_) => "unsupported_tool",
            ToolResultError::EmptyResult => "empty_result",
            ToolResultError::Malformed(_) => "malformed",
            ToolResultError::UnexpectedShape(_) => "unexpected_shape",
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (code, message, details) = if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "Invalid request body", body_err.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large",
            "request body exceeds the configured limit".to_string(),
        )
    } else {
        return Err(err);
    };

    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "details": details,
    }));

    Ok(warp::reply::with_status(json, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_stable_snake_case_labels() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ToolResultError::UnsupportedTool("x".into()).reason(), "unsupported_tool");
        assert_eq!(ToolResultError::EmptyResult.reason(), "empty_result");
        assert_eq!(ToolResultError::from(malformed).reason(), "malformed");
        assert_eq!(ToolResultError::UnexpectedShape("array").reason(), "unexpected_shape");
    }
}
