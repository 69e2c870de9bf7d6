//! Core data types for the dirbridge service.
//!
//! This module defines the inbound request/response bodies and the
//! models decoded from upstream search results. Upstream hit objects
//! arrive with capitalized field names (`RelPath`, `Score`, `Span`),
//! so the serde renames here are part of the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the process is up
    pub status: String,

    /// Crate version
    pub version: String,
}

/// Inbound body for `POST /search`
///
/// `query` is optional at the serde level so that a missing field
/// reaches the handler and is reported as a 400 with a JSON error
/// body rather than a rejection from the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search query text
    #[serde(default)]
    pub query: Option<String>,

    /// Number of hits to request from the upstream search tool
    #[serde(default)]
    pub k: Option<usize>,
}

/// Inbound body for `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Natural-language question
    #[serde(default)]
    pub question: Option<String>,
}

/// Composite text response for `/search` and `/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    /// Assembled text block for the voice agent to consume
    pub result: String,
}

/// Passthrough response for `/list_files` and `/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPassthrough {
    /// Concatenated textual content returned by the tool
    pub result: String,

    /// Structured payload returned by the tool, unmodified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
}

/// Structured payload of the upstream `dir2mcp.search` tool
///
/// An absent or empty `hits` array denotes zero matches, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// One search result as serialized by the upstream server
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Path of the matched file, relative to the indexed root
    #[serde(rename = "RelPath", default)]
    pub rel_path: String,

    /// Relevance score in [0, 1], descending across the hit list
    #[serde(rename = "Score", default)]
    pub score: f64,

    /// Location of the match within the file, when known
    #[serde(rename = "Span", default)]
    pub span: Span,
}

/// Location span attached to a search hit
///
/// Only `kind == "lines"` spans carry usable line bounds; other kinds
/// (pages, timestamps) are ignored by the bridge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Span {
    #[serde(rename = "Kind", default)]
    pub kind: String,

    #[serde(rename = "StartLine", default)]
    pub start_line: Option<i64>,

    #[serde(rename = "EndLine", default)]
    pub end_line: Option<i64>,
}

/// A search hit joined with fetched file content
///
/// Request-scoped: built by the enrichment pipeline and discarded
/// once the response is rendered.
#[derive(Debug, Clone)]
pub struct EnrichedHit {
    /// Path of the matched file
    pub file: String,

    /// Relevance score copied from the hit
    pub score: f64,

    /// Fetched content, empty when the per-hit fetch failed
    pub content: String,
}
