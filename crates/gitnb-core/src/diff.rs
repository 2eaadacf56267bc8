//! Comparing a notebook with its last-synced mirror

use std::io::Write;
use std::path::Path;

use gitnb_content::{DocumentCodec, ScriptDiff};
use gitnb_fs::{NormalizedPath, ProjectPath, io};

use crate::project::Project;
use crate::{Error, Result};

/// Difference between a tracked notebook and its mirror
#[derive(Debug, Clone)]
pub struct MirrorDiff {
    pub document: NormalizedPath,
    pub mirror: NormalizedPath,
    /// Mirror text (old) against freshly rendered notebook (new)
    pub diff: ScriptDiff,
}

impl MirrorDiff {
    /// Whether running an update would leave the mirror as it is
    pub fn is_clean(&self) -> bool {
        self.diff.is_equivalent
    }
}

/// Diff the mirror of `document` against the notebook as it is now.
///
/// The notebook is rendered into a throwaway file inside the project,
/// removed again on every exit path.
///
/// # Errors
///
/// - [`Error::NotTracked`] if `document` has no ledger entry
/// - [`Error::NotFound`] if the notebook or its mirror is missing
pub fn diff_against_mirror(project: &Project, document: impl AsRef<Path>) -> Result<MirrorDiff> {
    let document = project.relativize(document)?;
    let ledger = project.load_ledger()?;
    let entry = ledger.get(&document).ok_or_else(|| Error::NotTracked {
        path: document.to_native(),
    })?;

    let scratch_dir = project.root().join(ProjectPath::GitnbDir.as_str());
    std::fs::create_dir_all(scratch_dir.to_native())?;

    // Deleted when dropped, including on early return
    let mut scratch = tempfile::Builder::new()
        .prefix(".diff-")
        .suffix(&project.config().mirror_suffix)
        .tempfile_in(scratch_dir.to_native())?;

    let rendered = DocumentCodec::notebook_to_script(&project.absolute(&entry.document))?;
    scratch.write_all(rendered.as_bytes())?;
    scratch.flush()?;

    let regenerated = io::read_text(&NormalizedPath::new(scratch.path()))?;
    let synced = io::read_text(&project.absolute(&entry.mirror))?;

    let diff = ScriptDiff::compute(
        &synced,
        &regenerated,
        entry.mirror.as_str(),
        entry.document.as_str(),
    );
    tracing::debug!(
        document = %entry.document,
        insertions = diff.insertions(),
        deletions = diff.deletions(),
        "Computed mirror diff"
    );

    Ok(MirrorDiff {
        document: entry.document.clone(),
        mirror: entry.mirror.clone(),
        diff,
    })
}
