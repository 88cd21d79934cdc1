// validate.rs — Turning untrusted paths into ValidatedPath capabilities.
//
// Validation order matters:
// 1. Expand `~`, absolutize against the working directory, and collapse
//    `.`/`..` segments lexically (no filesystem access yet).
// 2. The lexical result must already lie under an allowed root.
// 3. For existing targets, resolve symlinks and require the *resolved*
//    path to lie under an allowed root as well. A symlink inside the
//    sandbox pointing outside it fails here.
// 4. For missing targets, the immediate parent must resolve inside the
//    sandbox; the path is returned unresolved with exists = false.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::SandboxError;
use crate::roots::AllowedRoots;

/// A path proven to lie inside the sandbox, symlinks included.
///
/// The only way to obtain one is [`PathValidator::validate`]; every
/// filesystem entry point in the other crates takes `&ValidatedPath`, so
/// an unchecked path cannot reach the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
    exists: bool,
}

impl ValidatedPath {
    pub(crate) fn new(path: PathBuf, exists: bool) -> Self {
        Self { path, exists }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Whether the target existed at validation time. Nothing prevents a
    /// concurrent writer from changing that afterwards.
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Validates caller-supplied paths against the allow-list.
#[derive(Debug, Clone)]
pub struct PathValidator {
    roots: Arc<AllowedRoots>,
}

impl PathValidator {
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &AllowedRoots {
        &self.roots
    }

    /// Validate a requested path, resolving symlinks.
    ///
    /// Returns `AccessDenied` when the path or its symlink-resolved form
    /// lies outside every allowed root, and `ParentUnreachable` for a
    /// not-yet-existing target whose parent is missing or out of bounds.
    pub fn validate(&self, requested: impl AsRef<Path>) -> Result<ValidatedPath, SandboxError> {
        let requested = requested.as_ref();
        let expanded = expand_home(requested);
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            let cwd = std::env::current_dir().map_err(|source| SandboxError::IoError {
                path: expanded.clone(),
                source,
            })?;
            cwd.join(expanded)
        };
        let normalized = normalize_lexically(&absolute);

        if !self.roots.contains(&normalized) {
            tracing::debug!(path = %normalized.display(), "denied: outside allowed roots");
            return Err(SandboxError::AccessDenied { path: normalized });
        }

        match fs::canonicalize(&normalized) {
            Ok(resolved) => {
                if !self.roots.contains(&resolved) {
                    tracing::debug!(
                        path = %normalized.display(),
                        resolved = %resolved.display(),
                        "denied: symlink target outside allowed roots"
                    );
                    return Err(SandboxError::AccessDenied { path: resolved });
                }
                Ok(ValidatedPath::new(resolved, true))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let parent = match normalized.parent() {
                    Some(parent) => parent.to_path_buf(),
                    None => return Err(SandboxError::ParentUnreachable { path: normalized }),
                };
                match fs::canonicalize(&parent) {
                    Ok(resolved_parent) if self.roots.contains(&resolved_parent) => {
                        Ok(ValidatedPath::new(normalized, false))
                    }
                    _ => Err(SandboxError::ParentUnreachable { path: normalized }),
                }
            }
            Err(source) => Err(SandboxError::IoError {
                path: normalized,
                source,
            }),
        }
    }
}

/// Expand a leading `~` to the home directory.
///
/// Only bare `~` and `~/...` are expanded; `~user` forms pass through
/// untouched, as does everything when no home directory is known.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let (Some(home), Ok(rest)) = (dirs::home_dir(), path.strip_prefix("~")) {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
