//! # warden-server
//!
//! The MCP server for Warden: twelve filesystem tools, every one of them
//! routed through the path sandbox before touching the OS. Expected
//! failures (access denied, destination collisions, unmatched edits)
//! come back as error-flagged tool results; only startup misconfiguration
//! and transport loss are fatal.

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::WardenServer;
