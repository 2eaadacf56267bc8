//! Tracking ledger
//!
//! The ledger maps each tracked notebook to its mirror script. It is kept
//! as a plaintext file, one `document<TAB>mirror` record per line, so it
//! stays readable and editable by hand. The parser is lenient about what
//! people type: blank lines and comment lines are skipped, and two
//! whitespace-separated fields are accepted in place of a tab.

mod entry;

pub use entry::TrackedEntry;

use crate::{Error, Result};
use fs2::FileExt;
use gitnb_fs::{NormalizedPath, io};
use std::fs::File;
use std::io::Read;

/// Ordered set of [`TrackedEntry`], unique by document path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<TrackedEntry>,
}

impl Ledger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse ledger text.
    ///
    /// A document listed more than once keeps its position from the first
    /// occurrence and the mirror from the last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ledger`] for a line that is not a two-field record.
    pub fn parse(content: &str, comment_prefix: &str) -> Result<Self> {
        let mut ledger = Self::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || (!comment_prefix.is_empty() && line.starts_with(comment_prefix))
            {
                continue;
            }

            let fields: Vec<&str> = if line.contains('\t') {
                line.split('\t').map(str::trim).collect()
            } else {
                line.split_whitespace().collect()
            };

            match fields.as_slice() {
                [document, mirror] if !document.is_empty() && !mirror.is_empty() => {
                    ledger.upsert(TrackedEntry::new(*document, *mirror));
                }
                _ => {
                    return Err(Error::Ledger {
                        line: idx + 1,
                        message: format!("expected 'document<TAB>mirror', found '{}'", line),
                    });
                }
            }
        }

        Ok(ledger)
    }

    /// Render the ledger in its on-disk form.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_line() + "\n")
            .collect()
    }

    /// Load a ledger file with a shared lock.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file is absent, [`Error::Ledger`] if a
    /// line cannot be parsed.
    pub fn load(path: &NormalizedPath, comment_prefix: &str) -> Result<Self> {
        let native = path.to_native();
        let file = File::open(&native).map_err(|e| gitnb_fs::Error::io(&native, e))?;
        file.lock_shared()
            .map_err(|_| gitnb_fs::Error::LockFailed {
                path: native.clone(),
            })?;

        // Read through the locked handle; the lock is released on drop
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| gitnb_fs::Error::io(&native, e))?;

        Self::parse(&content, comment_prefix)
    }

    /// Save the ledger atomically.
    ///
    /// A failed save leaves the previous file intact.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        io::write_text(path, &self.render())?;
        Ok(())
    }

    /// All entries in order
    pub fn entries(&self) -> &[TrackedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a document
    pub fn get(&self, document: &NormalizedPath) -> Option<&TrackedEntry> {
        self.entries.iter().find(|e| &e.document == document)
    }

    /// The entry whose mirror is `mirror`, if any
    pub fn mirror_owner(&self, mirror: &NormalizedPath) -> Option<&TrackedEntry> {
        self.entries.iter().find(|e| &e.mirror == mirror)
    }

    pub fn contains(&self, document: &NormalizedPath) -> bool {
        self.get(document).is_some()
    }

    /// Insert an entry, replacing any entry for the same document in place.
    ///
    /// Returns the replaced entry.
    pub fn upsert(&mut self, entry: TrackedEntry) -> Option<TrackedEntry> {
        match self.entries.iter_mut().find(|e| e.document == entry.document) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Remove the entry for a document.
    ///
    /// Returns the removed entry if found, None otherwise.
    pub fn remove(&mut self, document: &NormalizedPath) -> Option<TrackedEntry> {
        let pos = self.entries.iter().position(|e| &e.document == document)?;
        Some(self.entries.remove(pos))
    }

    /// Tracked document paths in ledger order
    pub fn documents(&self) -> Vec<NormalizedPath> {
        self.entries.iter().map(|e| e.document.clone()).collect()
    }

    /// Mirror paths in ledger order
    pub fn mirrors(&self) -> Vec<NormalizedPath> {
        self.entries.iter().map(|e| e.mirror.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_skips_blanks_and_comments() {
        let content = "# tracked notebooks\n\na.ipynb\tnbpy/a.nbpy.py\n  \n# b.ipynb\tx\n";
        let ledger = Ledger::parse(content, "#").unwrap();
        assert_eq!(
            ledger.entries(),
            [TrackedEntry::new("a.ipynb", "nbpy/a.nbpy.py")]
        );
    }

    #[test]
    fn parse_accepts_whitespace_separated_fields() {
        let ledger = Ledger::parse("a.ipynb    nbpy/a.nbpy.py\n", "#").unwrap();
        assert_eq!(ledger.get(&"a.ipynb".into()).unwrap().mirror.as_str(), "nbpy/a.nbpy.py");
    }

    #[test]
    fn parse_tab_form_allows_spaces_in_paths() {
        let ledger = Ledger::parse("my notes.ipynb\tnbpy/my notes.nbpy.py\n", "#").unwrap();
        assert_eq!(ledger.documents(), vec![NormalizedPath::new("my notes.ipynb")]);
    }

    #[test]
    fn parse_custom_comment_prefix() {
        let ledger = Ledger::parse("; note\na.ipynb b.py\n", ";").unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(Ledger::parse("; a longer note\n", "#").is_err());
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let err = Ledger::parse("a.ipynb\tb.py\nonly-one\n", "#").unwrap_err();
        assert!(matches!(err, Error::Ledger { line: 2, .. }));

        let err = Ledger::parse("a b c\n", "#").unwrap_err();
        assert!(matches!(err, Error::Ledger { line: 1, .. }));
    }

    #[test]
    fn parse_normalizes_leading_dot_slash() {
        let ledger = Ledger::parse("./a.ipynb\t./nbpy/a.nbpy.py\n", "#").unwrap();
        assert_eq!(ledger.render(), "a.ipynb\tnbpy/a.nbpy.py\n");
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut ledger = Ledger::new();
        ledger.upsert(TrackedEntry::new("a.ipynb", "one.py"));
        ledger.upsert(TrackedEntry::new("b.ipynb", "b.py"));
        let previous = ledger.upsert(TrackedEntry::new("a.ipynb", "two.py"));

        assert_eq!(previous, Some(TrackedEntry::new("a.ipynb", "one.py")));
        assert_eq!(ledger.render(), "a.ipynb\ttwo.py\nb.ipynb\tb.py\n");
    }

    #[test]
    fn remove_missing_is_none() {
        let mut ledger = Ledger::new();
        assert!(ledger.remove(&"a.ipynb".into()).is_none());
    }

    #[test]
    fn render_parses_back() {
        let mut ledger = Ledger::new();
        ledger.upsert(TrackedEntry::new("x/a.ipynb", "nbpy/x/a.nbpy.py"));
        ledger.upsert(TrackedEntry::new("b.ipynb", "nbpy/b.nbpy.py"));
        assert_eq!(Ledger::parse(&ledger.render(), "#").unwrap(), ledger);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join(".gitnb/notebooks"));

        let mut ledger = Ledger::new();
        ledger.upsert(TrackedEntry::new("a.ipynb", "nbpy/a.nbpy.py"));
        ledger.save(&path).unwrap();

        let temp = io::temp_path_for(&path.to_native());
        assert!(!temp.exists(), "Temporary file should be cleaned up");
        assert_eq!(Ledger::load(&path, "#").unwrap(), ledger);
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("notebooks"));
        assert!(matches!(
            Ledger::load(&path, "#"),
            Err(Error::NotFound { .. })
        ));
    }
}
