//! Upstream MCP client: session management and tool invocation
//!
//! Owns the only two pieces of process-wide mutable state in the
//! bridge: the cached session identifier and the request-id counter.
//! Both sit behind narrow guards; the handshake lock spans only the
//! `initialize` round-trip, never a whole request.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::error::{BridgeError, Result};
use crate::mcp::protocol::{self, RpcOutcome, RpcRequest, ToolResult};

/// Timeout for the `initialize` handshake
const INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for `tools/call` round-trips
const TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream session lifecycle
///
/// `Establishing` is only ever observed while the handshake lock is
/// held; a failed handshake transitions back to `Unset` so a later
/// call may retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unset,
    Establishing,
    Ready(String),
}

/// Shared MCP client for the dir2mcp endpoint
///
/// One instance per process, shared across all inbound request
/// handlers via `Arc`.
pub struct McpClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    session: Mutex<SessionState>,
    handshake_lock: tokio::sync::Mutex<()>,
    request_id: AtomicI64,
}

impl McpClient {
    /// Create a client for the configured upstream endpoint.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.upstream.url.clone(),
            token: config.token().to_string(),
            session: Mutex::new(SessionState::Unset),
            handshake_lock: tokio::sync::Mutex::new(()),
            request_id: AtomicI64::new(0),
        }
    }

    /// Issue a fresh request id, strictly greater than every id issued
    /// before it. Ids start at 1 and are never reused.
    fn next_id(&self) -> i64 {
        self.request_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session state, for diagnostics.
    pub fn session_state(&self) -> SessionState {
        self.state().clone()
    }

    /// Return the cached session identifier, establishing it on first
    /// use.
    ///
    /// Concurrent first callers serialize on the handshake lock so
    /// that exactly one `initialize` executes; late arrivals observe
    /// the cached result. The lock is released whether the handshake
    /// succeeds or fails, and failure leaves the session unset.
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable`: transport failure or non-2xx status
    /// - `ProtocolError`: handshake response without a session header
    pub async fn ensure_session(&self) -> Result<String> {
        if let SessionState::Ready(id) = &*self.state() {
            return Ok(id.clone());
        }

        let _guard = self.handshake_lock.lock().await;

        // Re-check: another caller may have finished the handshake
        // while we waited for the lock.
        if let SessionState::Ready(id) = &*self.state() {
            return Ok(id.clone());
        }

        *self.state() = SessionState::Establishing;
        match self.initialize().await {
            Ok(id) => {
                *self.state() = SessionState::Ready(id.clone());
                Ok(id)
            }
            Err(err) => {
                *self.state() = SessionState::Unset;
                Err(err)
            }
        }
    }

    /// Perform the `initialize` handshake and extract the session
    /// identifier from the response header.
    async fn initialize(&self) -> Result<String> {
        let request = RpcRequest::initialize(self.next_id());
        debug!(endpoint = %self.endpoint, "Initializing upstream MCP session");

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(INIT_TIMEOUT)
            .header(
                protocol::PROTOCOL_VERSION_HEADER,
                protocol::PROTOCOL_VERSION,
            )
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                BridgeError::UpstreamUnavailable(format!("initialize transport failure: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::UpstreamUnavailable(format!(
                "initialize returned HTTP {status}"
            )));
        }

        let session = response
            .headers()
            .get(protocol::SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                BridgeError::ProtocolError(format!(
                    "initialize response missing {} header",
                    protocol::SESSION_HEADER
                ))
            })?;

        info!(session = %session, "Upstream MCP session established");
        Ok(session)
    }

    /// Invoke a named tool through the established session.
    ///
    /// Never retried: tool calls may have upstream side effects.
    ///
    /// # Arguments
    ///
    /// * `name` - Upstream tool name (e.g. `dir2mcp.search`)
    /// * `arguments` - Tool arguments as a JSON object
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable`: transport failure or non-2xx status
    /// - `ProtocolError`: malformed response envelope
    /// - `ToolError`: the tool reported a JSON-RPC error; its payload
    ///   is carried verbatim for the route layer to pass through
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let session = self.ensure_session().await?;
        let request = RpcRequest::tool_call(self.next_id(), name, arguments);
        debug!(tool = %name, id = request.id, "Calling upstream tool");

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(TOOL_TIMEOUT)
            .header(
                protocol::PROTOCOL_VERSION_HEADER,
                protocol::PROTOCOL_VERSION,
            )
            .header(protocol::SESSION_HEADER, &session)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                BridgeError::UpstreamUnavailable(format!("tools/call transport failure: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::UpstreamUnavailable(format!(
                "tools/call returned HTTP {status}"
            )));
        }

        let body = response.bytes().await.map_err(|err| {
            BridgeError::UpstreamUnavailable(format!("tools/call body read failure: {err}"))
        })?;

        match protocol::parse_response(&body)? {
            RpcOutcome::Success(result) => protocol::decode_tool_result(result),
            RpcOutcome::Error(payload) => {
                let code = payload
                    .get("code")
                    .and_then(Value::as_i64)
                    .unwrap_or(-32603);
                Err(BridgeError::ToolError { code, payload })
            }
        }
    }
}
