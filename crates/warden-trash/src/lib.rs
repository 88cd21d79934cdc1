//! # warden-trash
//!
//! Soft delete for Warden.
//!
//! Nothing the server "deletes" is destroyed: [`Quarantine::move_to_trash`]
//! relocates the item into a `Trash` directory under its owning allowed
//! root. Names that collide with earlier deletions get a UTC timestamp
//! suffix, and anything already sitting in a trash directory refuses to be
//! trashed again.

pub mod error;
pub mod quarantine;

pub use error::TrashError;
pub use quarantine::{Quarantine, TrashEntry, TRASH_DIR_NAME};
