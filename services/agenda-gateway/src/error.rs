//! Error types for the agenda gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the agenda gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

// Errors reaching a handler become the generic 500 with no body.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
