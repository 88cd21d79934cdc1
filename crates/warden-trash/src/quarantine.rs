// quarantine.rs — Copy-then-remove soft delete into <root>/Trash.
//
// Rename is deliberately avoided: source and trash directory can sit on
// different volumes, where rename fails. The price is at-least-once
// semantics — a crash between copy and removal leaves both the original
// and the trashed copy behind.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use warden_sandbox::{AllowedRoots, ValidatedPath};

use crate::error::TrashError;

/// Name of the trash directory created under each allowed root.
pub const TRASH_DIR_NAME: &str = "Trash";

/// A record of one completed soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEntry {
    /// Where the item lived before the delete.
    pub source: PathBuf,
    /// Where it lives now, under its root's trash directory.
    pub trashed_to: PathBuf,
}

/// Soft-delete mechanism: relocates items into per-root trash directories.
#[derive(Debug, Clone)]
pub struct Quarantine {
    roots: Arc<AllowedRoots>,
}

impl Quarantine {
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self { roots }
    }

    /// Move a validated path into its owning root's trash directory.
    ///
    /// The trash directory is created on first use. A name collision gets
    /// a UTC timestamp inserted before the extension so earlier trashed
    /// items are never overwritten. Items already under a trash directory
    /// are rejected with `AlreadyTrashed`, and an allowed root itself
    /// cannot be trashed (its own trash directory lives inside it).
    pub fn move_to_trash(&self, target: &ValidatedPath) -> Result<TrashEntry, TrashError> {
        let source = target.as_path();
        let root = self
            .roots
            .owning_root(source)
            .ok_or_else(|| TrashError::OutsideRoots {
                path: source.to_path_buf(),
            })?;

        if self.roots.paths().iter().any(|r| r == source) {
            return Err(TrashError::RootItself {
                path: source.to_path_buf(),
            });
        }

        let trash_dir = root.join(TRASH_DIR_NAME);
        if source.starts_with(&trash_dir) {
            return Err(TrashError::AlreadyTrashed {
                path: source.to_path_buf(),
            });
        }

        let metadata = fs::metadata(source).map_err(|source_err| TrashError::IoError {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        fs::create_dir_all(&trash_dir).map_err(|source_err| TrashError::IoError {
            path: trash_dir.clone(),
            source: source_err,
        })?;

        let file_name = match source.file_name() {
            Some(name) => name.to_os_string(),
            None => {
                return Err(TrashError::IoError {
                    path: source.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "path has no file name",
                    ),
                })
            }
        };

        let destination = reserve_destination(&trash_dir, &file_name);

        if metadata.is_dir() {
            copy_tree(source, &destination)?;
            fs::remove_dir_all(source).map_err(|source_err| TrashError::IoError {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        } else {
            fs::copy(source, &destination).map_err(|source_err| TrashError::IoError {
                path: source.to_path_buf(),
                source: source_err,
            })?;
            fs::remove_file(source).map_err(|source_err| TrashError::IoError {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        }

        tracing::info!(
            source = %source.display(),
            trashed_to = %destination.display(),
            "moved item to trash"
        );

        Ok(TrashEntry {
            source: source.to_path_buf(),
            trashed_to: destination,
        })
    }
}

/// Pick a non-colliding destination name inside the trash directory.
///
/// The base name is used as-is when free; otherwise a sortable UTC
/// timestamp (and, for same-second repeats, a counter) goes between the
/// file stem and extension.
fn reserve_destination(trash_dir: &Path, file_name: &OsStr) -> PathBuf {
    let plain = trash_dir.join(file_name);
    if fs::symlink_metadata(&plain).is_err() {
        return plain;
    }

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let mut candidate = trash_dir.join(stamped_name(file_name, &stamp));
    let mut attempt = 1;
    while fs::symlink_metadata(&candidate).is_ok() {
        candidate = trash_dir.join(stamped_name(file_name, &format!("{stamp}-{attempt}")));
        attempt += 1;
    }
    candidate
}

/// Insert `stamp` between the file stem and its extension.
fn stamped_name(file_name: &OsStr, stamp: &str) -> OsString {
    let as_path = Path::new(file_name);
    let mut stamped = match as_path.file_stem() {
        Some(stem) => stem.to_os_string(),
        None => file_name.to_os_string(),
    };
    stamped.push(".");
    stamped.push(stamp);
    if let Some(extension) = as_path.extension() {
        stamped.push(".");
        stamped.push(extension);
    }
    stamped
}

/// Copy a directory tree with an explicit work stack.
///
/// Symlinks are recreated as links, never followed: a relative link stays
/// valid inside the relocated tree, and a link to a directory would
/// otherwise make `fs::copy` fail mid-tree.
fn copy_tree(source: &Path, destination: &Path) -> Result<(), TrashError> {
    let mut stack = vec![(source.to_path_buf(), destination.to_path_buf())];
    while let Some((from, to)) = stack.pop() {
        fs::create_dir_all(&to).map_err(|source_err| TrashError::IoError {
            path: to.clone(),
            source: source_err,
        })?;
        let entries = fs::read_dir(&from).map_err(|source_err| TrashError::IoError {
            path: from.clone(),
            source: source_err,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source_err| TrashError::IoError {
                path: from.clone(),
                source: source_err,
            })?;
            let child = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry.file_type().map_err(|source_err| TrashError::IoError {
                path: child.clone(),
                source: source_err,
            })?;
            if file_type.is_symlink() {
                copy_link(&child, &target)?;
            } else if file_type.is_dir() {
                stack.push((child, target));
            } else {
                fs::copy(&child, &target).map_err(|source_err| TrashError::IoError {
                    path: child.clone(),
                    source: source_err,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> Result<(), TrashError> {
    let referent = fs::read_link(link).map_err(|source_err| TrashError::IoError {
        path: link.to_path_buf(),
        source: source_err,
    })?;
    std::os::unix::fs::symlink(&referent, target).map_err(|source_err| TrashError::IoError {
        path: target.to_path_buf(),
        source: source_err,
    })
}

#[cfg(not(unix))]
fn copy_link(link: &Path, _target: &Path) -> Result<(), TrashError> {
    tracing::debug!(path = %link.display(), "skipping symlink during tree copy");
    Ok(())
}
