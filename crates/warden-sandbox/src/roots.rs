// roots.rs — The startup allow-list of directory roots.
//
// AllowedRoots is built exactly once, before any operation is accepted,
// and never mutated afterward. Components share it behind an Arc and read
// it without synchronization. Containment is component-wise: a root /data
// must not admit /data2, so naive string-prefix comparison is off the
// table — Path::starts_with compares whole segments.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SandboxError;
use crate::validate::expand_home;

/// The immutable set of directories the server may touch.
///
/// Every entry is resolved to its real (symlink-followed) form at
/// construction and verified to be an existing directory. Construction
/// failure is meant to be fatal to the process.
#[derive(Debug)]
pub struct AllowedRoots {
    roots: Vec<PathBuf>,
}

impl AllowedRoots {
    /// Build the allow-list from operator-supplied paths.
    ///
    /// Each entry is home-expanded, resolved through symlinks, and must
    /// stat as a directory. An empty list is rejected.
    pub fn new(entries: impl IntoIterator<Item = PathBuf>) -> Result<Self, SandboxError> {
        let mut roots = Vec::new();
        for entry in entries {
            let expanded = expand_home(&entry);
            let canonical =
                fs::canonicalize(&expanded).map_err(|source| SandboxError::RootUnavailable {
                    path: expanded.clone(),
                    source,
                })?;
            let metadata =
                fs::metadata(&canonical).map_err(|source| SandboxError::RootUnavailable {
                    path: canonical.clone(),
                    source,
                })?;
            if !metadata.is_dir() {
                return Err(SandboxError::NotADirectory { path: canonical });
            }
            roots.push(canonical);
        }
        if roots.is_empty() {
            return Err(SandboxError::EmptyRoots);
        }
        Ok(Self { roots })
    }

    /// Whether `path` lies under at least one allowed root.
    ///
    /// Segment-aware: `/data` does not contain `/data2`.
    pub fn contains(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    /// The allowed root that contains `path`, if any.
    pub fn owning_root(&self, path: &Path) -> Option<&Path> {
        self.roots
            .iter()
            .find(|root| path.starts_with(root))
            .map(PathBuf::as_path)
    }

    /// The configured roots, in the order they were supplied.
    pub fn paths(&self) -> &[PathBuf] {
        &self.roots
    }
}
