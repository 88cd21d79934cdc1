//! # warden-daemon
//!
//! Warden MCP server daemon.
//!
//! Starts an MCP server on stdio that an agent connects to. Every tool
//! call is confined to the allowed directories given on the command
//! line: paths and their symlink targets must resolve inside one of
//! them, and deletes land in a per-root `Trash` directory instead of
//! destroying anything.
//!
//! ## Usage
//!
//! Typically started by the MCP client via `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "warden": {
//!       "type": "stdio",
//!       "command": "warden-daemon",
//!       "args": ["/home/me/projects", "/home/me/scratch"]
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use warden_server::{ServerConfig, WardenServer};

/// Warden sandboxed filesystem MCP server.
#[derive(Parser)]
#[command(name = "warden-daemon", version, about = "Warden sandboxed filesystem MCP server")]
struct Cli {
    /// Directories the server may access. At least one is required;
    /// everything outside them is refused.
    #[arg(required = true, value_name = "DIR")]
    allowed_directories: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interfere with MCP on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("warden_daemon=info".parse()?)
                .add_directive("warden_server=info".parse()?)
                .add_directive("warden_sandbox=info".parse()?)
                .add_directive("warden_files=info".parse()?)
                .add_directive("warden_trash=info".parse()?)
                .add_directive("warden_patch=info".parse()?)
                .add_directive("warden_walk=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Warden MCP server");

    let config = ServerConfig::new(cli.allowed_directories);
    let server = WardenServer::new(config)?;
    for root in server.allowed_roots().paths() {
        tracing::info!("Allowed directory: {}", root.display());
    }

    tracing::info!("MCP server ready, waiting for client connection");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

    service.waiting().await?;

    tracing::info!("MCP server shutting down");
    Ok(())
}
