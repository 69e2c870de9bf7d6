//! Outbound MCP adapter
//!
//! Talks JSON-RPC 2.0 over HTTP POST to a single configured dir2mcp
//! endpoint. Owns the process-wide session and request-id state.

pub mod client;
pub mod protocol;

pub use client::McpClient;
pub use protocol::ToolResult;
