//! # warden-files
//!
//! Plain file operations for Warden: copy, move, directory creation,
//! whole-file reads and writes, and metadata retrieval. Every entry point
//! takes a [`ValidatedPath`](warden_sandbox::ValidatedPath), so nothing
//! in this crate can touch a path the sandbox has not cleared.

pub mod error;
pub mod info;
pub mod ops;

pub use error::FilesError;
pub use info::{stat, FileInfo};
pub use ops::{copy_path, create_dir, move_path, read_file, write_file};
