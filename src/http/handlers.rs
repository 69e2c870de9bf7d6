//! HTTP request handlers for the bridge API
//!
//! Implements handlers for all 5 REST endpoints: health, search,
//! ask, list files, and stats. Validation happens here; everything
//! upstream-facing lives in core/ and mcp/.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::core::enrich::{self, DEFAULT_SEARCH_K};
use crate::core::error::BridgeError;
use crate::core::services::Services;
use crate::core::types::*;

/// Health check handler
///
/// Returns server status and version information. Never contacts the
/// upstream, so it reports ok even when the indexing server is down.
///
/// # Returns
///
/// JSON response with status "ok" and version number
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Search handler
///
/// Runs the upstream search tool, fetches full source text for the
/// top hits, and returns one composite text block.
///
/// # Arguments
///
/// * `services` - Shared application state
/// * `req` - Search request with query and optional hit count
///
/// # Returns
///
/// Composite `{"result": ...}` text on success
///
/// # Errors
///
/// - `InvalidRequest`: `query` missing or empty (upstream untouched)
/// - `UpstreamUnavailable` / `ProtocolError`: session or transport
///   failure
/// - `ToolError`: the search tool reported an error, passed through
pub async fn search_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<BridgeResponse>, BridgeError> {
    let query = match req.query.as_deref() {
        Some(query) if !query.trim().is_empty() => query,
        _ => return Err(BridgeError::InvalidRequest("query is required".to_string())),
    };

    let k = req.k.unwrap_or(DEFAULT_SEARCH_K);
    let hits = enrich::search_and_enrich(&services.mcp, query, k).await?;

    Ok(Json(BridgeResponse {
        result: enrich::render_search_results(&hits),
    }))
}

/// Ask handler
///
/// Answers a question by searching and returning full source text.
/// The bridge itself never synthesizes an answer; the downstream
/// agent's language model does, from the raw blocks returned here.
///
/// # Arguments
///
/// * `services` - Shared application state
/// * `req` - Ask request with the question text
///
/// # Errors
///
/// Same shape as the search handler, keyed on `question`.
pub async fn ask_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<BridgeResponse>, BridgeError> {
    let question = match req.question.as_deref() {
        Some(question) if !question.trim().is_empty() => question,
        _ => {
            return Err(BridgeError::InvalidRequest(
                "question is required".to_string(),
            ))
        }
    };

    let hits = enrich::search_and_enrich(&services.mcp, question, DEFAULT_SEARCH_K).await?;

    Ok(Json(BridgeResponse {
        result: enrich::render_ask_context(question, &hits),
    }))
}

/// List files handler
///
/// Passthrough of the upstream `dir2mcp.list_files` tool.
pub async fn list_files_handler(
    State(services): State<Arc<Services>>,
) -> Result<Json<ToolPassthrough>, BridgeError> {
    let result = services
        .mcp
        .call_tool("dir2mcp.list_files", json!({}))
        .await?;

    Ok(Json(ToolPassthrough {
        result: result.text,
        structured: result.structured,
    }))
}

/// Stats handler
///
/// Passthrough of the upstream `dir2mcp.stats` tool.
pub async fn stats_handler(
    State(services): State<Arc<Services>>,
) -> Result<Json<ToolPassthrough>, BridgeError> {
    let result = services.mcp.call_tool("dir2mcp.stats", json!({})).await?;

    Ok(Json(ToolPassthrough {
        result: result.text,
        structured: result.structured,
    }))
}
