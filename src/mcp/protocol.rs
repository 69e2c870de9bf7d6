//! JSON-RPC 2.0 envelope codec for the MCP wire protocol
//!
//! Pure transforms: builds outbound request envelopes and parses
//! inbound response bodies. No IO happens here.

use crate::core::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Protocol version declared on every outbound call
pub const PROTOCOL_VERSION: &str = "2025-11-25";

/// Response header carrying the session identifier
pub const SESSION_HEADER: &str = "MCP-Session-Id";

/// Request header carrying the declared protocol version
pub const PROTOCOL_VERSION_HEADER: &str = "MCP-Protocol-Version";

const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// Outbound JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    jsonrpc: &'static str,
    pub id: i64,
    method: &'static str,
    params: Value,
}

impl RpcRequest {
    /// Build an `initialize` handshake request with the fixed protocol
    /// version, client identity, and an empty capability set.
    pub fn initialize(id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: METHOD_INITIALIZE,
            params: json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        }
    }

    /// Build a `tools/call` request for a named tool.
    pub fn tool_call(id: i64, name: &str, arguments: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: METHOD_TOOLS_CALL,
            params: json!({
                "name": name,
                "arguments": arguments,
            }),
        }
    }
}

/// Parsed response envelope: exactly one of result / error
#[derive(Debug)]
pub enum RpcOutcome {
    Success(Value),
    Error(Value),
}

/// Parse a response body into a result or an error payload.
///
/// A body that is not JSON, or that carries both or neither of
/// `result` and `error`, is malformed and surfaced as `ProtocolError`.
pub fn parse_response(body: &[u8]) -> Result<RpcOutcome> {
    let mut envelope: Value = serde_json::from_slice(body)
        .map_err(|err| BridgeError::ProtocolError(format!("invalid JSON-RPC body: {err}")))?;

    let result = envelope.get_mut("result").map(Value::take);
    let error = envelope.get_mut("error").map(Value::take);

    match (result, error) {
        (Some(result), None) => Ok(RpcOutcome::Success(result)),
        (None, Some(error)) => Ok(RpcOutcome::Error(error)),
        (Some(_), Some(_)) => Err(BridgeError::ProtocolError(
            "response carried both result and error".to_string(),
        )),
        (None, None) => Err(BridgeError::ProtocolError(
            "response carried neither result nor error".to_string(),
        )),
    }
}

/// One entry of a tool result's content list
#[derive(Debug, Deserialize)]
struct ToolContentItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawToolResult {
    #[serde(default)]
    content: Vec<ToolContentItem>,
    #[serde(rename = "structuredContent", default)]
    structured: Option<Value>,
}

/// Decoded outcome of a successful `tools/call`
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// All textual content entries, joined by newline in returned order
    pub text: String,

    /// Structured payload, passed through unmodified
    pub structured: Option<Value>,
}

/// Decode a `tools/call` result object.
///
/// Concatenates all content entries flagged as text; non-text entries
/// are skipped without reordering the rest.
pub fn decode_tool_result(result: Value) -> Result<ToolResult> {
    let raw: RawToolResult = serde_json::from_value(result)
        .map_err(|err| BridgeError::ProtocolError(format!("malformed tool result: {err}")))?;

    let text = raw
        .content
        .iter()
        .filter(|item| item.kind == "text")
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ToolResult {
        text,
        structured: raw.structured,
    })
}
