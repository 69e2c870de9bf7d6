//! Shared test fixtures: an in-process stub dir2mcp upstream and
//! helpers for driving the bridge router.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt as TowerServiceExt;

use dirbridge::core::config::Config;
use dirbridge::core::services::Services;
use dirbridge::http;

/// Configurable stub behavior plus everything it observed.
pub struct StubState {
    /// Session id issued by the stub's initialize handshake
    pub session_id: String,

    /// Artificial latency inside the handshake, to widen race windows
    pub init_delay: Duration,

    /// Number of initialize attempts to fail with HTTP 500 before
    /// succeeding
    pub fail_inits: AtomicUsize,

    /// Hits array returned in the search tool's structured payload
    pub search_hits: Mutex<Value>,

    /// When set, the search tool responds with this JSON-RPC error
    pub search_error: Mutex<Option<Value>>,

    /// rel_paths whose open_file call returns a JSON-RPC error
    pub failing_files: Mutex<Vec<String>>,

    // Observations
    pub init_count: AtomicUsize,
    pub search_count: AtomicUsize,
    pub open_file_count: AtomicUsize,
    pub seen_request_ids: Mutex<Vec<i64>>,
    pub seen_tool_sessions: Mutex<Vec<String>>,
    pub seen_tool_auth: Mutex<Vec<String>>,
    pub seen_open_file_args: Mutex<Vec<Value>>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            session_id: "sess-stub-1".to_string(),
            init_delay: Duration::ZERO,
            fail_inits: AtomicUsize::new(0),
            search_hits: Mutex::new(json!([])),
            search_error: Mutex::new(None),
            failing_files: Mutex::new(Vec::new()),
            init_count: AtomicUsize::new(0),
            search_count: AtomicUsize::new(0),
            open_file_count: AtomicUsize::new(0),
            seen_request_ids: Mutex::new(Vec::new()),
            seen_tool_sessions: Mutex::new(Vec::new()),
            seen_tool_auth: Mutex::new(Vec::new()),
            seen_open_file_args: Mutex::new(Vec::new()),
        }
    }
}

impl StubState {
    pub fn with_hits(hits: Value) -> Self {
        let stub = Self::default();
        *stub.search_hits.lock().unwrap() = hits;
        stub
    }
}

/// Build a Go-style hit object the way the upstream serializes them.
pub fn lines_hit(rel_path: &str, score: f64, start_line: i64, end_line: i64) -> Value {
    json!({
        "RelPath": rel_path,
        "Score": score,
        "Span": {"Kind": "lines", "StartLine": start_line, "EndLine": end_line},
    })
}

fn rpc_result(id: i64, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn rpc_error(id: i64, error: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": error})
}

async fn stub_handler(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let id = body["id"].as_i64().unwrap_or(0);
    stub.seen_request_ids.lock().unwrap().push(id);

    match body["method"].as_str().unwrap_or("") {
        "initialize" => {
            if stub.fail_inits.load(Ordering::SeqCst) > 0 {
                stub.fail_inits.fetch_sub(1, Ordering::SeqCst);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }

            tokio::time::sleep(stub.init_delay).await;
            stub.init_count.fetch_add(1, Ordering::SeqCst);

            let result = rpc_result(
                id,
                json!({
                    "protocolVersion": "2025-11-25",
                    "capabilities": {},
                    "serverInfo": {"name": "stub-dir2mcp", "version": "0.0.0"},
                }),
            );
            let mut response = Json(result).into_response();
            response.headers_mut().insert(
                "mcp-session-id",
                HeaderValue::from_str(&stub.session_id).unwrap(),
            );
            response
        }
        "tools/call" => {
            let session = headers
                .get("mcp-session-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            stub.seen_tool_sessions.lock().unwrap().push(session);

            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            stub.seen_tool_auth.lock().unwrap().push(auth);

            let name = body["params"]["name"].as_str().unwrap_or("");
            let arguments = body["params"]["arguments"].clone();

            match name {
                "dir2mcp.search" => {
                    stub.search_count.fetch_add(1, Ordering::SeqCst);
                    if let Some(error) = stub.search_error.lock().unwrap().clone() {
                        return Json(rpc_error(id, error)).into_response();
                    }

                    let hits = stub.search_hits.lock().unwrap().clone();
                    let count = hits.as_array().map(Vec::len).unwrap_or(0);
                    Json(rpc_result(
                        id,
                        json!({
                            "content": [
                                {"type": "text", "text": format!("found {count} result(s)")},
                            ],
                            "structuredContent": {
                                "query": arguments["query"],
                                "k": arguments["k"],
                                "hits": hits,
                            },
                        }),
                    ))
                    .into_response()
                }
                "dir2mcp.open_file" => {
                    stub.open_file_count.fetch_add(1, Ordering::SeqCst);
                    stub.seen_open_file_args
                        .lock()
                        .unwrap()
                        .push(arguments.clone());

                    let rel_path = arguments["rel_path"].as_str().unwrap_or("").to_string();
                    if stub.failing_files.lock().unwrap().contains(&rel_path) {
                        return Json(rpc_error(
                            id,
                            json!({"code": -32000, "message": "open failed"}),
                        ))
                        .into_response();
                    }

                    Json(rpc_result(
                        id,
                        json!({
                            "content": [
                                {"type": "text", "text": format!("contents of {rel_path}")},
                            ],
                        }),
                    ))
                    .into_response()
                }
                "dir2mcp.list_files" => Json(rpc_result(
                    id,
                    json!({
                        "content": [{"type": "text", "text": "3 file(s) indexed"}],
                        "structuredContent": {"files": ["a.md", "b.md", "c.md"]},
                    }),
                ))
                .into_response(),
                "dir2mcp.stats" => Json(rpc_result(
                    id,
                    json!({
                        "content": [{"type": "text", "text": "3 files, 12 chunks"}],
                        "structuredContent": {"files": 3, "chunks": 12},
                    }),
                ))
                .into_response(),
                other => Json(rpc_error(
                    id,
                    json!({"code": -32601, "message": format!("unknown tool: {other}")}),
                ))
                .into_response(),
            }
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Bind the stub upstream on an ephemeral port and serve it in the
/// background. Returns the endpoint URL to point the bridge at.
pub async fn spawn_stub(stub: Arc<StubState>) -> String {
    let app = Router::new()
        .route("/mcp", post(stub_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/mcp")
}

/// Build the bridge services pointed at an upstream endpoint.
pub fn bridge_services(upstream_url: &str) -> Arc<Services> {
    let mut config = Config::default();
    config.upstream.url = upstream_url.to_string();
    config.upstream.token = Some("test-token".to_string());
    Arc::new(Services::new(config))
}

/// Build the full bridge router pointed at an upstream endpoint.
pub fn bridge_app(upstream_url: &str) -> Router {
    http::router(bridge_services(upstream_url))
}

/// POST a JSON body to the bridge router and decode the response.
pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// GET a path on the bridge router and decode the response.
pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
