//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration from the environment, builds the
//! server with its tool table, and hands it to the configured transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use devkit_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone());
    info!("Server initialized with {} tools", server.tool_count());

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = parse_level(level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
