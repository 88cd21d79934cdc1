// search.rs — Case-insensitive name search with exclusion patterns.
//
// Exclusions come in two forms. A pattern without any wildcard character
// excludes every entry whose root-relative path contains a segment equal
// to it ("node_modules" prunes the whole subtree). Anything else is a
// glob, matched against the root-relative path; patterns that fail to
// compile exclude nothing, the same fail-closed treatment invalid globs
// get elsewhere in the stack.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use glob::Pattern;
use warden_sandbox::{PathValidator, ValidatedPath};

use crate::error::WalkError;
use crate::types::EntryKind;
use crate::walker::read_sorted;

enum ExcludeRule {
    Segment(String),
    Glob(Pattern),
}

fn compile_excludes(patterns: &[String]) -> Vec<ExcludeRule> {
    let mut rules = Vec::new();
    for raw in patterns {
        if raw.contains(['*', '?', '[']) {
            match Pattern::new(raw) {
                Ok(pattern) => rules.push(ExcludeRule::Glob(pattern)),
                Err(err) => {
                    tracing::debug!(pattern = %raw, error = %err, "ignoring unparseable exclude pattern");
                }
            }
        } else {
            rules.push(ExcludeRule::Segment(raw.clone()));
        }
    }
    rules
}

fn is_excluded(rules: &[ExcludeRule], relative: &Path) -> bool {
    rules.iter().any(|rule| match rule {
        ExcludeRule::Segment(name) => relative
            .components()
            .any(|component| component.as_os_str() == OsStr::new(name)),
        ExcludeRule::Glob(pattern) => pattern.matches(&relative.to_string_lossy()),
    })
}

/// Depth-first search under a validated directory.
///
/// An entry matches when its name contains `name_pattern`
/// case-insensitively; matches are absolute paths in traversal order.
/// Matching directories are still descended into. Entries that fail
/// re-validation mid-walk are skipped silently so one hostile or dangling
/// entry cannot abort the search.
pub fn search(
    validator: &PathValidator,
    start: &ValidatedPath,
    name_pattern: &str,
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>, WalkError> {
    let needle = name_pattern.to_lowercase();
    let rules = compile_excludes(exclude_patterns);
    let root = start.as_path();

    let mut matches = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    let mut at_start = true;

    while let Some(dir) = stack.pop() {
        let entries = match read_sorted(&dir) {
            Ok(entries) => entries,
            Err(err) if at_start => return Err(err),
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };
        at_start = false;

        let mut subdirs = Vec::new();
        for entry in entries {
            if validator.validate(&entry.path).is_err() {
                tracing::debug!(path = %entry.path.display(), "skipping entry that failed re-validation");
                continue;
            }
            let relative = match entry.path.strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            if is_excluded(&rules, relative) {
                continue;
            }
            if entry.name.to_lowercase().contains(&needle) {
                matches.push(entry.path.clone());
            }
            if entry.kind == EntryKind::Directory {
                subdirs.push(entry.path);
            }
        }
        // Reversed so the stack pops subdirectories in name order.
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;
    use warden_sandbox::AllowedRoots;

    fn validator_for(root: &Path) -> PathValidator {
        let roots = AllowedRoots::new(vec![root.to_path_buf()]).unwrap();
        PathValidator::new(Arc::new(roots))
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Report.PDF"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive/summary.pdf"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "pdf", &[]).unwrap();

        assert_eq!(names(&found), vec!["Report.PDF", "summary.pdf"]);
    }

    #[test]
    fn matching_directories_are_reported_and_descended() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/app.log"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "log", &[]).unwrap();

        assert_eq!(names(&found), vec!["logs", "app.log"]);
    }

    #[test]
    fn bare_exclude_prunes_the_named_subtree() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), b"x").unwrap();
        fs::write(dir.path().join("index.js"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "index", &["node_modules".to_string()]).unwrap();

        assert_eq!(names(&found), vec!["index.js"]);
        assert_eq!(found[0], start.as_path().join("index.js"));
    }

    #[test]
    fn glob_excludes_apply_to_the_relative_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();
        fs::write(dir.path().join("drop.log"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.log"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "", &["*.log".to_string()]).unwrap();

        let found = names(&found);
        assert!(found.contains(&"keep.txt".to_string()));
        assert!(!found.contains(&"drop.log".to_string()));
        assert!(!found.contains(&"nested.log".to_string()));
    }

    #[test]
    fn unparseable_exclude_patterns_exclude_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "a", &["[unclosed".to_string()]).unwrap();

        assert_eq!(names(&found), vec!["a.txt"]);
    }

    #[test]
    fn dot_files_are_matchable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(dir.path()).unwrap();
        let found = search(&validator, &start, "env", &[]).unwrap();

        assert_eq!(names(&found), vec![".env"]);
    }

    #[cfg(unix)]
    #[test]
    fn entries_failing_revalidation_are_skipped_silently() {
        let allowed = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let secret = outside.path().join("secret-match.txt");
        fs::write(&secret, b"x").unwrap();

        std::os::unix::fs::symlink(&secret, allowed.path().join("escape-match.txt")).unwrap();
        fs::write(allowed.path().join("real-match.txt"), b"x").unwrap();

        let validator = validator_for(allowed.path());
        let start = validator.validate(allowed.path()).unwrap();
        let found = search(&validator, &start, "match", &[]).unwrap();

        assert_eq!(names(&found), vec!["real-match.txt"]);
    }

    #[test]
    fn search_on_a_file_path_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let validator = validator_for(dir.path());
        let start = validator.validate(&file).unwrap();
        let result = search(&validator, &start, "x", &[]);
        assert!(matches!(result, Err(WalkError::IoError { .. })));
    }
}
