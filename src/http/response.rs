//! HTTP rendering for bridge errors
//!
//! Maps the core error taxonomy onto status codes and `{"error": ...}`
//! bodies. Tool errors pass the upstream JSON-RPC error payload
//! through verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::BridgeError;

impl BridgeError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BridgeError::UpstreamUnavailable(_) | BridgeError::ProtocolError(_) => {
                StatusCode::BAD_GATEWAY
            }
            BridgeError::ToolError { .. }
            | BridgeError::ConfigError(_)
            | BridgeError::IoError(_)
            | BridgeError::SerdeError(_)
            | BridgeError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Upstream tool errors are surfaced as-is, never wrapped.
            BridgeError::ToolError { payload, .. } => Json(json!({ "error": payload })),
            other => Json(json!({ "error": other.to_string() })),
        };

        (status, body).into_response()
    }
}
