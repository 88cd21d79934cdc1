// walker.rs — Flat listing and iterative tree construction.
//
// Tree construction re-validates every directory through the sandbox
// before reading it. The walk itself runs on an explicit frame stack; a
// directory's frame is popped when its entries are exhausted, and the
// completed node is attached to the parent frame below it.

use std::fs;
use std::path::{Path, PathBuf};

use warden_sandbox::{PathValidator, ValidatedPath};

use crate::error::WalkError;
use crate::types::{DirEntry, EntryKind, TreeNode};

pub(crate) struct RawEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) kind: EntryKind,
}

/// Read a directory's entries, sorted by name.
///
/// Kinds come from `DirEntry::file_type`, which does not follow symlinks:
/// a symlink to a directory is reported as a file.
pub(crate) fn read_sorted(dir: &Path) -> Result<Vec<RawEntry>, WalkError> {
    let reader = fs::read_dir(dir).map_err(|source| WalkError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|source| WalkError::IoError {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| WalkError::IoError {
            path: entry.path(),
            source,
        })?;
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(RawEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// List the immediate children of a validated directory, sorted by name.
pub fn list(dir: &ValidatedPath) -> Result<Vec<DirEntry>, WalkError> {
    let entries = read_sorted(dir.as_path())?;
    Ok(entries
        .into_iter()
        .map(|entry| DirEntry {
            name: entry.name,
            kind: entry.kind,
        })
        .collect())
}

struct Frame {
    name: String,
    entries: std::vec::IntoIter<RawEntry>,
    children: Vec<TreeNode>,
}

fn open_frame(validator: &PathValidator, path: &Path, name: String) -> Result<Frame, WalkError> {
    let validated = validator.validate(path)?;
    let entries = read_sorted(validated.as_path())?;
    Ok(Frame {
        name,
        entries: entries.into_iter(),
        children: Vec::new(),
    })
}

/// Build the recursive tree under a validated directory.
///
/// Returns the children of the target (the caller already knows the
/// target's own name). A validation failure anywhere in the walk aborts
/// the whole operation.
pub fn tree(validator: &PathValidator, dir: &ValidatedPath) -> Result<Vec<TreeNode>, WalkError> {
    let mut stack = vec![open_frame(validator, dir.as_path(), String::new())?];

    while let Some(mut frame) = stack.pop() {
        match frame.entries.next() {
            Some(entry) => match entry.kind {
                EntryKind::File => {
                    frame.children.push(TreeNode::file(entry.name));
                    stack.push(frame);
                }
                EntryKind::Directory => {
                    let child = open_frame(validator, &entry.path, entry.name)?;
                    stack.push(frame);
                    stack.push(child);
                }
            },
            None => {
                let completed = TreeNode::directory(frame.name, frame.children);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(completed),
                    None => return Ok(completed.children.unwrap_or_default()),
                }
            }
        }
    }

    Ok(Vec::new())
}
