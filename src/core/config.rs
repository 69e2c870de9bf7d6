//! Configuration management for the dirbridge service.
//!
//! This module handles loading configuration from an optional TOML
//! file and environment variables, with sensible defaults for all
//! settings. The bearer credential is resolved at startup from the
//! environment or a fallback on-disk token file; absence of both is
//! a fatal startup condition.

use crate::core::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Listening address configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream MCP endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// JSON-RPC endpoint of the dir2mcp server
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Bearer credential; resolved from `MCP_TOKEN` or the token file
    /// when not set here
    #[serde(default)]
    pub token: Option<String>,

    /// Fallback on-disk token file
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8087/mcp".to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".dir2mcp/secret.token")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            token: None,
            token_file: default_token_file(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus environment
    /// overrides, then resolve the bearer credential.
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit config file path; when `None`, reads
    ///   `dirbridge.toml` from the working directory if present
    ///
    /// # Errors
    ///
    /// - `TomlError`: config file exists but fails to parse
    /// - `ConfigError`: no credential in config, environment, or the
    ///   token file
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let default_path = PathBuf::from("dirbridge.toml");
        let path = path.unwrap_or(&default_path);

        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.resolve_token()?;

        Ok(config)
    }

    /// Apply `MCP_URL`, `MCP_TOKEN`, `BRIDGE_HOST`, and `BRIDGE_PORT`
    /// overrides from the environment.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("MCP_URL") {
            if !url.is_empty() {
                self.upstream.url = url;
            }
        }
        if let Ok(token) = env::var("MCP_TOKEN") {
            if !token.is_empty() {
                self.upstream.token = Some(token);
            }
        }
        if let Ok(host) = env::var("BRIDGE_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = env::var("BRIDGE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    /// Resolve the bearer credential, falling back to the token file.
    fn resolve_token(&mut self) -> Result<()> {
        if matches!(&self.upstream.token, Some(t) if !t.trim().is_empty()) {
            return Ok(());
        }

        if self.upstream.token_file.exists() {
            let raw = fs::read_to_string(&self.upstream.token_file)?;
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.upstream.token = Some(trimmed.to_string());
                return Ok(());
            }
        }

        Err(BridgeError::ConfigError(format!(
            "no upstream credential: set MCP_TOKEN or provide {}",
            self.upstream.token_file.display()
        )))
    }

    /// Resolved bearer credential.
    ///
    /// Only valid after `load` succeeded; defaults to empty otherwise.
    pub fn token(&self) -> &str {
        self.upstream.token.as_deref().unwrap_or("")
    }

    /// Log the effective configuration at startup.
    ///
    /// Logs a short token fingerprint, never the full credential.
    pub fn log_config(&self) {
        let token = self.token();
        let fingerprint: String = token.chars().take(8).collect();
        tracing::info!(
            upstream = %self.upstream.url,
            token_prefix = %fingerprint,
            "Upstream endpoint configured"
        );
        tracing::info!(
            host = %self.server.host,
            port = %self.server.port,
            "Listening address configured"
        );
    }
}
