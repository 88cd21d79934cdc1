// engine.rs — Sequential multi-strategy edit application.
//
// Each edit is tried against the current in-memory buffer: exact substring
// first, then a line window matched with outer whitespace trimmed. A miss
// aborts the whole batch before anything reaches disk, so the file is
// either fully rewritten or untouched.

use std::fs;
use std::path::Path;

use warden_sandbox::ValidatedPath;

use crate::diff::{self, DiffResult};
use crate::error::PatchError;

/// One replacement to apply against a file's content buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub old_text: String,
    pub new_text: String,
}

/// Apply `edits` in order to the file at `path`.
///
/// Line endings are normalized to LF in the file content and in both
/// sides of every edit before matching, so callers need not mirror the
/// file's ending convention. On success the final buffer is written back
/// (unless `dry_run`) and a unified diff of the whole batch is returned.
/// The first edit with no match fails the batch with
/// [`PatchError::EditNotFound`] carrying the edit's old text as supplied.
pub fn apply_edits(
    path: &ValidatedPath,
    edits: &[Edit],
    dry_run: bool,
) -> Result<DiffResult, PatchError> {
    let original = read_normalized(path.as_path())?;
    let mut buffer = original.clone();

    for edit in edits {
        let old = normalize_line_endings(&edit.old_text);
        let new = normalize_line_endings(&edit.new_text);
        buffer = apply_one(&buffer, &old, &new).ok_or_else(|| PatchError::EditNotFound {
            old_text: edit.old_text.clone(),
        })?;
    }

    let label = path.as_path().display().to_string();
    let rendered = diff::unified(&label, &original, &buffer);
    let fenced = diff::fence(&rendered);

    if !dry_run {
        fs::write(path.as_path(), &buffer).map_err(|source| PatchError::IoError {
            path: path.as_path().to_path_buf(),
            source,
        })?;
        tracing::info!(path = %label, edits = edits.len(), "applied edit batch");
    }

    Ok(DiffResult {
        diff: rendered,
        fenced,
    })
}

fn read_normalized(path: &Path) -> Result<String, PatchError> {
    let raw = fs::read_to_string(path).map_err(|source| PatchError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_line_endings(&raw))
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Try both matching strategies; `None` means the edit has no match.
fn apply_one(buffer: &str, old: &str, new: &str) -> Option<String> {
    if buffer.contains(old) {
        return Some(buffer.replacen(old, new, 1));
    }

    let lines: Vec<&str> = buffer.split('\n').collect();
    let old_lines: Vec<&str> = old.split('\n').collect();
    if old_lines.len() > lines.len() {
        return None;
    }

    for start in 0..=lines.len() - old_lines.len() {
        let window = &lines[start..start + old_lines.len()];
        let matched = window
            .iter()
            .zip(old_lines.iter())
            .all(|(have, want)| have.trim() == want.trim());
        if !matched {
            continue;
        }

        let mut spliced: Vec<String> = Vec::with_capacity(lines.len());
        spliced.extend(lines[..start].iter().map(|line| (*line).to_string()));
        spliced.extend(reindent(window[0], &old_lines, new));
        spliced.extend(
            lines[start + old_lines.len()..]
                .iter()
                .map(|line| (*line).to_string()),
        );
        return Some(spliced.join("\n"));
    }

    None
}

/// Rebuild the replacement lines with indentation re-derived from the
/// matched window.
///
/// The first line inherits the window's leading indentation verbatim, so
/// a tab-indented file stays tab-indented even when the edit was written
/// with spaces. Each later line keeps that indentation adjusted by the
/// width difference between its paired new and old lines; a line with no
/// pair, or where either side starts at column zero, passes through
/// unchanged.
fn reindent(window_first: &str, old_lines: &[&str], new: &str) -> Vec<String> {
    let window_indent = leading_whitespace(window_first);
    let window_width = window_indent.chars().count();

    new.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                return format!("{window_indent}{}", line.trim_start());
            }
            let old_indent = old_lines
                .get(index)
                .map(|old| leading_whitespace(old))
                .unwrap_or("");
            let new_indent = leading_whitespace(line);
            if old_indent.is_empty() || new_indent.is_empty() {
                return line.to_string();
            }

            let width = (window_width + new_indent.chars().count())
                .saturating_sub(old_indent.chars().count());
            let body = line.trim_start();
            if width >= window_width {
                let padding = " ".repeat(width - window_width);
                format!("{window_indent}{padding}{body}")
            } else {
                let kept: String = window_indent.chars().take(width).collect();
                format!("{kept}{body}")
            }
        })
        .collect()
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
