//! SyncEngine implementation
//!
//! Regenerates every tracked mirror from its notebook and rewrites only
//! the mirrors whose bytes changed. Script rendering is deterministic, so
//! byte comparison is enough to tell whether anything changed.

use gitnb_content::DocumentCodec;
use gitnb_fs::{NormalizedPath, io};

use crate::ledger::TrackedEntry;
use crate::project::Project;
use crate::{Error, Result};

/// Report from an update run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Mirrors that were rewritten, in ledger order
    pub changed: Vec<NormalizedPath>,
    /// Mirrors already up to date
    pub unchanged: Vec<NormalizedPath>,
    /// One [`Error::Sync`] per entry that failed
    pub errors: Vec<Error>,
}

impl SyncReport {
    /// Whether every entry was processed without error
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Engine for updating mirrors
pub struct SyncEngine<'a> {
    project: &'a Project,
}

impl<'a> SyncEngine<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Update every tracked mirror.
    ///
    /// A failing entry (for example a deleted notebook) is recorded in the
    /// report and the run carries on with the next one.
    ///
    /// # Errors
    ///
    /// Only fails as a whole if the ledger cannot be loaded.
    pub fn update_all(&self) -> Result<SyncReport> {
        let ledger = self.project.load_ledger()?;
        let mut report = SyncReport::default();

        for entry in ledger.entries() {
            match self.update_entry(entry) {
                Ok(true) => {
                    tracing::info!(mirror = %entry.mirror, "Updated mirror");
                    report.changed.push(entry.mirror.clone());
                }
                Ok(false) => {
                    tracing::debug!(mirror = %entry.mirror, "Mirror up to date");
                    report.unchanged.push(entry.mirror.clone());
                }
                Err(e) => {
                    tracing::warn!(document = %entry.document, error = %e, "Failed to update mirror");
                    report.errors.push(Error::Sync {
                        document: entry.document.to_native(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Regenerate one mirror; `true` if it was rewritten.
    fn update_entry(&self, entry: &TrackedEntry) -> Result<bool> {
        let script = DocumentCodec::notebook_to_script(&self.project.absolute(&entry.document))?;
        let changed = io::write_text_if_changed(&self.project.absolute(&entry.mirror), &script)?;
        Ok(changed)
    }
}
