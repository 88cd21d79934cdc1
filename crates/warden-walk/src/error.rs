// error.rs — Error types for hierarchy operations.

use std::path::PathBuf;
use thiserror::Error;
use warden_sandbox::SandboxError;

/// Errors that can occur while listing, walking, or searching.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Re-validation of a directory failed mid-walk.
    #[error("{0}")]
    Sandbox(#[from] SandboxError),

    /// An OS-level operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
