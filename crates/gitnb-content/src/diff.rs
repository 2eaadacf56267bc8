//! Line diffs between script texts

use similar::{ChangeTag, TextDiff};

/// Lines of context shown around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Result of comparing two script texts line by line
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptDiff {
    /// Are the texts identical?
    pub is_equivalent: bool,
    /// Individual line changes, in order
    pub changes: Vec<LineChange>,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f64,
    /// Unified diff text, empty when the texts are identical
    pub unified: String,
}

/// A single changed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// Line present only in the new text
    Added { content: String },
    /// Line present only in the old text
    Removed { content: String },
}

impl ScriptDiff {
    /// Create a diff indicating the texts are identical
    pub fn equivalent() -> Self {
        Self {
            is_equivalent: true,
            changes: Vec::new(),
            similarity: 1.0,
            unified: String::new(),
        }
    }

    /// Compute a line diff from `old` to `new`.
    ///
    /// The labels become the `---`/`+++` headers of the unified diff.
    pub fn compute(old: &str, new: &str, old_label: &str, new_label: &str) -> Self {
        if old == new {
            return Self::equivalent();
        }

        let text_diff = TextDiff::from_lines(old, new);
        let similarity = text_diff.ratio() as f64;

        let changes = text_diff
            .iter_all_changes()
            .filter_map(|change| match change.tag() {
                ChangeTag::Delete => Some(LineChange::Removed {
                    content: change.value().to_string(),
                }),
                ChangeTag::Insert => Some(LineChange::Added {
                    content: change.value().to_string(),
                }),
                ChangeTag::Equal => None,
            })
            .collect::<Vec<_>>();

        let unified = text_diff
            .unified_diff()
            .context_radius(CONTEXT_RADIUS)
            .header(old_label, new_label)
            .to_string();

        Self {
            is_equivalent: changes.is_empty(),
            changes,
            similarity,
            unified,
        }
    }

    /// Number of added lines
    pub fn insertions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, LineChange::Added { .. }))
            .count()
    }

    /// Number of removed lines
    pub fn deletions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, LineChange::Removed { .. }))
            .count()
    }
}

impl Default for ScriptDiff {
    fn default() -> Self {
        Self::equivalent()
    }
}
