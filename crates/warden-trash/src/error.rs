// error.rs — Error types for the quarantine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while trashing an item.
#[derive(Debug, Error)]
pub enum TrashError {
    /// The item already lives under its root's trash directory.
    #[error("'{path}' is already in the trash")]
    AlreadyTrashed { path: PathBuf },

    /// An allowed root cannot be trashed: its trash directory lives
    /// inside it, and removing it would break the sandbox boundary.
    #[error("cannot trash the allowed root '{path}'")]
    RootItself { path: PathBuf },

    /// The path is not contained in any allowed root. Unreachable for
    /// paths produced by the validator; kept explicit rather than panicking.
    #[error("'{path}' is not inside any allowed directory")]
    OutsideRoots { path: PathBuf },

    /// An OS-level operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
