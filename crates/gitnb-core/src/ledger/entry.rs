//! A single ledger record

use gitnb_fs::NormalizedPath;

use crate::{Error, Result};

/// A tracked notebook and the script mirroring it.
///
/// Both paths are project-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    pub document: NormalizedPath,
    pub mirror: NormalizedPath,
}

impl TrackedEntry {
    pub fn new(document: impl Into<NormalizedPath>, mirror: impl Into<NormalizedPath>) -> Self {
        Self {
            document: document.into(),
            mirror: mirror.into(),
        }
    }

    /// The on-disk line for this entry, without terminator.
    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.document, self.mirror)
    }

    /// Check that this entry survives a save and reload unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] for a path containing a tab or line break,
    /// with surrounding whitespace, or a document that would read back as
    /// a comment line.
    pub fn check_recordable(&self, comment_prefix: &str) -> Result<()> {
        for path in [&self.document, &self.mirror] {
            let text = path.as_str();
            if text.contains(['\t', '\n', '\r']) {
                return Err(Error::invalid_path(
                    path.to_native(),
                    "contains a tab or line break, which the ledger cannot record",
                ));
            }
            if text.trim() != text {
                return Err(Error::invalid_path(
                    path.to_native(),
                    "has leading or trailing whitespace, which the ledger cannot record",
                ));
            }
        }
        if !comment_prefix.is_empty() && self.document.as_str().starts_with(comment_prefix) {
            return Err(Error::invalid_path(
                self.document.to_native(),
                format!("starts with the ledger comment prefix '{}'", comment_prefix),
            ));
        }
        Ok(())
    }
}
