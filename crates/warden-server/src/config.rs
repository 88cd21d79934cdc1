// config.rs — Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Startup configuration for the Warden server.
///
/// The allowed directories are the sandbox boundary: every tool call
/// must resolve inside one of them. They are resolved and checked once
/// at startup and never change for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directories the server may read and mutate.
    pub allowed_directories: Vec<PathBuf>,
}

impl ServerConfig {
    pub fn new(allowed_directories: Vec<PathBuf>) -> Self {
        Self {
            allowed_directories,
        }
    }
}
