//! Core domain logic for the dirbridge service
//!
//! Protocol-agnostic: knows nothing about Axum extractors or HTTP
//! status codes. The enrichment pipeline drives the upstream MCP
//! client but never touches the inbound transport.

pub mod config;
pub mod enrich;
pub mod error;
pub mod services;
pub mod types;
