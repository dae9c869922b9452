//! Handpuppet - Window-relative input synthesis MCP server for Linux
//!
//! This MCP server lets AI assistants drive a desktop application with
//! mouse, wheel and keyboard gestures anchored to its window.

use handpuppet::config::Config;
use handpuppet::server::HandpuppetServer;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr to keep stdout clean for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Handpuppet MCP Server");

    let config = Config::from_env();
    tracing::debug!("Configuration: {:?}", config);

    let server = HandpuppetServer::new(&config)?;

    // Run with stdio transport
    let transport = stdio();

    tracing::info!(
        "Handpuppet MCP Server ready, targeting '{}', listening on stdio",
        config.default_app
    );

    let service = server.serve(transport).await?;

    // Wait for graceful shutdown
    service.waiting().await?;

    tracing::info!("Handpuppet MCP Server shutting down");
    Ok(())
}
