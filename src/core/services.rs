//! Unified service container for dirbridge
//!
//! Provides shared access to the configuration and the upstream MCP
//! client. One instance per process, handed to every handler by
//! reference; there is no other shared mutable state.

use crate::core::config::Config;
use crate::mcp::McpClient;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Shared upstream MCP client (session + request-id state)
    pub mcp: Arc<McpClient>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let mcp = Arc::new(McpClient::new(&config));
        Self {
            mcp,
            config: Arc::new(config),
        }
    }
}
