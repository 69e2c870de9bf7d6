//! Dirbridge HTTP server entry point
//!
//! Starts the REST bridge in front of a dir2mcp MCP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dirbridge::core::config::Config;
use dirbridge::core::services::Services;
use dirbridge::http;

#[derive(Parser, Debug)]
#[command(name = "dirbridge", version, about = "REST-to-MCP bridge for dir2mcp")]
struct Cli {
    /// Path to a TOML config file (defaults to ./dirbridge.toml)
    #[arg(long, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dirbridge=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting dirbridge");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    // Load configuration; missing credentials are fatal here, before
    // the listener binds.
    let config = Config::load(cli.config.as_deref())?;
    config.log_config();

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create shared services (upstream client, config)
    let services = Arc::new(Services::new(config));

    // Build the API router
    let app = http::router(services);

    // Bind to address and start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Endpoints: /health, /search, /ask, /list_files, /stats");

    // Serve the application
    axum::serve(listener, app).await?;

    Ok(())
}
