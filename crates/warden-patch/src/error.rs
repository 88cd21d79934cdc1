// error.rs — Error types for the patch engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while applying an edit batch.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Neither the exact nor the line-window strategy matched this edit's
    /// old text. The whole batch is discarded.
    #[error("could not find a match for edit:\n{old_text}")]
    EditNotFound { old_text: String },

    /// Reading or writing the target file failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
