// error.rs — Error types for plain file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from copy, move, create, read and write operations.
#[derive(Debug, Error)]
pub enum FilesError {
    /// A copy or move destination is already occupied. Nothing is
    /// overwritten.
    #[error("destination already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
