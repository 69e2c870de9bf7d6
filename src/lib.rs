//! Dirbridge - REST-to-MCP bridge for dir2mcp
//!
//! A thin HTTP bridge that accepts simple REST/JSON calls from a
//! voice-agent platform and re-expresses each as an MCP (JSON-RPC
//! 2.0 over HTTP) tool call against a dir2mcp document-indexing
//! server, enriching search results with full source text before
//! returning them.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - enrich (search -> per-hit content fetch pipeline)
//!   - services (unified service container)
//!
//! - **mcp**: Outbound MCP client adapter
//!   - protocol (JSON-RPC envelope codec)
//!   - client (session manager, request ids, tool invoker)
//!
//! - **http**: Inbound REST adapter (depends on core)
//!   - handlers, middleware, response
//!
//! # Key Behaviors
//!
//! - Exactly one upstream session per process, established lazily
//!   under a handshake guard
//! - Monotonic request ids across all in-flight requests
//! - Two-step enrichment (search then open_file) with partial-failure
//!   tolerance on the per-hit fetches
//! - No retries anywhere: tool calls may have upstream side effects

// Core domain logic (protocol-agnostic)
pub mod core;

// Outbound MCP client adapter
pub mod mcp;

// Inbound HTTP REST adapter
pub mod http;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{BridgeError, Result};
pub use crate::core::services::Services;
pub use crate::core::types::*;
