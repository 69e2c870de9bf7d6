//! Error types and error handling for the dirbridge service.
//!
//! This module defines the error types used throughout the
//! application. HTTP-specific rendering (status codes, response
//! bodies) is handled in the http adapter module.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for the bridge service
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A required inbound field is missing or empty. Detected at the
    /// route boundary; the upstream is never contacted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failure or non-success HTTP status from the
    /// indexing server.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Malformed JSON-RPC envelope or a handshake response without a
    /// session identifier.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// The upstream tool itself reported a JSON-RPC error. The payload
    /// is carried verbatim and passed through to the caller unwrapped.
    #[error("Upstream tool error (code {code})")]
    ToolError { code: i64, payload: Value },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}
