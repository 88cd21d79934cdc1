// ops.rs — Copy, move, create, read, write.
//
// Copy and move never overwrite: the destination is re-checked right
// before the mutation and an existing entry, dangling symlink included,
// fails with AlreadyExists. Moves use rename, so a cross-volume move
// surfaces the OS error instead of silently degrading to copy.

use std::fs;
use std::path::Path;

use warden_sandbox::ValidatedPath;

use crate::error::FilesError;

/// Copy a file or a whole directory tree to a vacant destination.
pub fn copy_path(source: &ValidatedPath, destination: &ValidatedPath) -> Result<(), FilesError> {
    ensure_vacant(destination.as_path())?;
    let metadata = stat_source(source.as_path())?;

    if metadata.is_dir() {
        copy_tree(source.as_path(), destination.as_path())?;
    } else {
        fs::copy(source.as_path(), destination.as_path()).map_err(|source_err| {
            FilesError::IoError {
                path: destination.as_path().to_path_buf(),
                source: source_err,
            }
        })?;
    }

    tracing::info!(
        source = %source.as_path().display(),
        destination = %destination.as_path().display(),
        "copied"
    );
    Ok(())
}

/// Rename a file or directory to a vacant destination.
pub fn move_path(source: &ValidatedPath, destination: &ValidatedPath) -> Result<(), FilesError> {
    ensure_vacant(destination.as_path())?;
    fs::rename(source.as_path(), destination.as_path()).map_err(|source_err| {
        FilesError::IoError {
            path: source.as_path().to_path_buf(),
            source: source_err,
        }
    })?;

    tracing::info!(
        source = %source.as_path().display(),
        destination = %destination.as_path().display(),
        "moved"
    );
    Ok(())
}

/// Create a directory. Succeeds when it already exists.
pub fn create_dir(path: &ValidatedPath) -> Result<(), FilesError> {
    fs::create_dir_all(path.as_path()).map_err(|source| FilesError::IoError {
        path: path.as_path().to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.as_path().display(), "created directory");
    Ok(())
}

/// Replace the file's content, creating it if missing.
pub fn write_file(path: &ValidatedPath, content: &str) -> Result<(), FilesError> {
    fs::write(path.as_path(), content).map_err(|source| FilesError::IoError {
        path: path.as_path().to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.as_path().display(),
        bytes = content.len(),
        "wrote file"
    );
    Ok(())
}

/// Read the file's content as UTF-8 text.
pub fn read_file(path: &ValidatedPath) -> Result<String, FilesError> {
    fs::read_to_string(path.as_path()).map_err(|source| FilesError::IoError {
        path: path.as_path().to_path_buf(),
        source,
    })
}

fn ensure_vacant(path: &Path) -> Result<(), FilesError> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(FilesError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn stat_source(path: &Path) -> Result<fs::Metadata, FilesError> {
    fs::metadata(path).map_err(|source| FilesError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a directory tree with an explicit work stack.
///
/// Symlinks are recreated as links, never followed: a relative link stays
/// valid inside the copied tree, and a link to a directory would otherwise
/// make `fs::copy` fail mid-tree.
fn copy_tree(source: &Path, destination: &Path) -> Result<(), FilesError> {
    let mut stack = vec![(source.to_path_buf(), destination.to_path_buf())];
    while let Some((from, to)) = stack.pop() {
        fs::create_dir_all(&to).map_err(|source_err| FilesError::IoError {
            path: to.clone(),
            source: source_err,
        })?;
        let entries = fs::read_dir(&from).map_err(|source_err| FilesError::IoError {
            path: from.clone(),
            source: source_err,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source_err| FilesError::IoError {
                path: from.clone(),
                source: source_err,
            })?;
            let child = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry.file_type().map_err(|source_err| FilesError::IoError {
                path: child.clone(),
                source: source_err,
            })?;
            if file_type.is_symlink() {
                copy_link(&child, &target)?;
            } else if file_type.is_dir() {
                stack.push((child, target));
            } else {
                fs::copy(&child, &target).map_err(|source_err| FilesError::IoError {
                    path: child.clone(),
                    source: source_err,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> Result<(), FilesError> {
    let referent = fs::read_link(link).map_err(|source_err| FilesError::IoError {
        path: link.to_path_buf(),
        source: source_err,
    })?;
    std::os::unix::fs::symlink(&referent, target).map_err(|source_err| FilesError::IoError {
        path: target.to_path_buf(),
        source: source_err,
    })
}

#[cfg(not(unix))]
fn copy_link(link: &Path, _target: &Path) -> Result<(), FilesError> {
    tracing::debug!(path = %link.display(), "skipping symlink during tree copy");
    Ok(())
}
