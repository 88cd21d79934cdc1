// error.rs — Error types for the path sandbox.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or querying the sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The path (or what it resolves to) lies outside every allowed root.
    #[error("access denied: '{path}' is outside the allowed directories")]
    AccessDenied { path: PathBuf },

    /// A not-yet-existing path whose parent directory is missing or
    /// resolves outside the allowed roots.
    #[error("parent directory of '{path}' is missing or outside the allowed directories")]
    ParentUnreachable { path: PathBuf },

    /// An allowed root could not be resolved at startup.
    #[error("allowed directory '{path}' cannot be resolved: {source}")]
    RootUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An allowed root exists but is not a directory.
    #[error("allowed directory is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// The allow-list is empty.
    #[error("no allowed directories configured")]
    EmptyRoots,

    /// An OS-level query failed for a reason other than the path missing.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
