//! # warden-patch
//!
//! The text edit engine for Warden.
//!
//! An edit batch is applied to one file's in-memory buffer, edit by edit.
//! Each edit first tries exact substring replacement; when the caller's
//! copy of the text differs from the file in whitespace only, a
//! line-window fallback matches lines after trimming and re-derives the
//! file's own indentation for the replacement. A batch either fully
//! applies or leaves the file untouched, and every successful batch
//! yields a unified diff wrapped in a collision-proof fence.

pub mod diff;
pub mod engine;
pub mod error;

pub use diff::DiffResult;
pub use engine::{apply_edits, Edit};
pub use error::PatchError;
