// info.rs — File metadata retrieval.

use std::fs;

use chrono::{DateTime, Utc};
use serde::Serialize;
use warden_sandbox::ValidatedPath;

use crate::error::FilesError;

/// Metadata for one file or directory, shaped for direct JSON rendering.
///
/// Timestamps are UTC. Fields the platform cannot provide (creation time
/// on some filesystems, permission bits off Unix) are omitted rather than
/// zeroed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed: Option<DateTime<Utc>>,
    pub is_directory: bool,
    pub is_file: bool,
    /// Low nine permission bits in octal, e.g. "644".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

/// Stat a validated path, following symlinks.
pub fn stat(path: &ValidatedPath) -> Result<FileInfo, FilesError> {
    let metadata = fs::metadata(path.as_path()).map_err(|source| FilesError::IoError {
        path: path.as_path().to_path_buf(),
        source,
    })?;

    Ok(FileInfo {
        size: metadata.len(),
        created: metadata.created().ok().map(DateTime::<Utc>::from),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        accessed: metadata.accessed().ok().map(DateTime::<Utc>::from),
        is_directory: metadata.is_dir(),
        is_file: metadata.is_file(),
        permissions: permission_bits(&metadata),
    })
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<String> {
    use std::os::unix::fs::PermissionsExt;
    Some(format!("{:03o}", metadata.permissions().mode() & 0o777))
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;
    use warden_sandbox::{AllowedRoots, PathValidator};

    fn validator_for(root: &Path) -> PathValidator {
        let roots = AllowedRoots::new(vec![root.to_path_buf()]).unwrap();
        PathValidator::new(Arc::new(roots))
    }

    #[test]
    fn stat_reports_size_and_kind() {
        let dir = tempdir().unwrap();
        let validator = validator_for(dir.path());
        let file = dir.path().join("five.txt");
        fs::write(&file, b"12345").unwrap();

        let info = stat(&validator.validate(&file).unwrap()).unwrap();

        assert_eq!(info.size, 5);
        assert!(info.is_file);
        assert!(!info.is_directory);
        assert!(info.modified.is_some());
    }

    #[test]
    fn stat_reports_directories() {
        let dir = tempdir().unwrap();
        let validator = validator_for(dir.path());
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let info = stat(&validator.validate(&sub).unwrap()).unwrap();

        assert!(info.is_directory);
        assert!(!info.is_file);
    }

    #[cfg(unix)]
    #[test]
    fn permissions_render_as_three_octal_digits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let validator = validator_for(dir.path());
        let file = dir.path().join("locked.txt");
        fs::write(&file, b"x").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        let info = stat(&validator.validate(&file).unwrap()).unwrap();
        assert_eq!(info.permissions.as_deref(), Some("640"));
    }

    #[test]
    fn serialized_keys_are_camel_case() {
        let dir = tempdir().unwrap();
        let validator = validator_for(dir.path());
        let file = dir.path().join("shape.txt");
        fs::write(&file, b"x").unwrap();

        let info = stat(&validator.validate(&file).unwrap()).unwrap();
        let value = serde_json::to_value(&info).unwrap();

        assert!(value.get("isDirectory").is_some());
        assert!(value.get("isFile").is_some());
        assert!(value.get("is_directory").is_none());
    }
}
