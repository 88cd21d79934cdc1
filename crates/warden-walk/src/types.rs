// types.rs — Serializable results of hierarchy operations.

use serde::Serialize;

/// Whether an entry is a file or a directory.
///
/// Determined without following symlinks, so a symlink to a directory is
/// reported as a file and never descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// A node in a recursive directory tree.
///
/// Directories always carry a children list, even when empty; file nodes
/// never carry one (the field is absent from their serialized form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub(crate) fn file(name: String) -> Self {
        Self {
            name,
            kind: EntryKind::File,
            children: None,
        }
    }

    pub(crate) fn directory(name: String, children: Vec<TreeNode>) -> Self {
        Self {
            name,
            kind: EntryKind::Directory,
            children: Some(children),
        }
    }
}
