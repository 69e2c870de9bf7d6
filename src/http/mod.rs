//! HTTP REST adapter
//!
//! Depends only on core/. Exposes the bridge endpoints consumed by
//! the voice-agent platform via the Axum web framework.

pub mod handlers;
pub mod middleware;
pub mod response;

pub use handlers::*;

use crate::core::services::Services;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the bridge router with all routes, middleware, and state.
///
/// `/list_files` and `/stats` accept both GET and POST so the voice
/// platform can register them either way.
pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/search", post(handlers::search_handler))
        .route("/ask", post(handlers::ask_handler))
        .route(
            "/list_files",
            get(handlers::list_files_handler).post(handlers::list_files_handler),
        )
        .route(
            "/stats",
            get(handlers::stats_handler).post(handlers::stats_handler),
        )
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
