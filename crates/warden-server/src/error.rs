// error.rs — Error types for the MCP server.

use thiserror::Error;

/// Any failure a tool operation can surface.
///
/// Tool handlers render these as error-flagged results, never protocol
/// errors, so a denied path or a missed edit cannot take the transport
/// down. The messages carried by the component errors are what the
/// client sees.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Path validation refused the request.
    #[error("{0}")]
    Sandbox(#[from] warden_sandbox::SandboxError),

    /// The quarantine refused or failed a soft delete.
    #[error("{0}")]
    Trash(#[from] warden_trash::TrashError),

    /// A listing, tree, or search operation failed.
    #[error("{0}")]
    Walk(#[from] warden_walk::WalkError),

    /// A plain file operation failed.
    #[error("{0}")]
    Files(#[from] warden_files::FilesError),

    /// An edit batch failed.
    #[error("{0}")]
    Patch(#[from] warden_patch::PatchError),

    /// A tool payload could not be serialized.
    #[error("response serialization failed: {0}")]
    Response(String),
}
