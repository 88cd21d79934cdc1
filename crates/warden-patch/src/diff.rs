// diff.rs — Unified diff rendering and fence wrapping.

use similar::TextDiff;

/// The audit output of a successful edit batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Unified diff between the original and final content. Empty when
    /// nothing changed.
    pub diff: String,
    /// The same diff wrapped in a backtick fence wide enough that no
    /// backtick run inside the diff can terminate it early.
    pub fenced: String,
}

/// Render a unified diff labeled with the same path on both sides.
pub(crate) fn unified(label: &str, original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(3)
        .header(label, label)
        .to_string()
}

/// Wrap a diff in a backtick fence tagged `diff`.
///
/// The fence is one backtick longer than the longest backtick run inside
/// the diff, and never narrower than three.
pub(crate) fn fence(diff: &str) -> String {
    let mut run = 0usize;
    let mut longest = 0usize;
    for c in diff.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let width = (longest + 1).max(3);
    let marker = "`".repeat(width);
    format!("{marker}diff\n{diff}{marker}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_produces_empty_diff() {
        assert_eq!(unified("f.txt", "same\n", "same\n"), "");
    }

    #[test]
    fn diff_is_labeled_with_the_same_path_twice() {
        let diff = unified("dir/f.txt", "old\n", "new\n");
        assert!(diff.starts_with("--- dir/f.txt\n+++ dir/f.txt\n"));
        assert!(diff.contains("-old"));
        assert!(diff.contains("+new"));
    }

    #[test]
    fn fence_defaults_to_three_backticks() {
        let fenced = fence("-a\n+b\n");
        assert!(fenced.starts_with("```diff\n"));
        assert!(fenced.ends_with("```\n\n"));
    }

    #[test]
    fn fence_outgrows_backtick_runs_in_the_diff() {
        let fenced = fence("+let s = \"````\";\n");
        assert!(fenced.starts_with("`````diff\n"));
        assert!(!fenced.starts_with("``````"));
    }
}
