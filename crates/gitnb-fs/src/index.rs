//! Recursive notebook discovery
//!
//! Walks a directory tree in a deterministic order (entries sorted by
//! file name at every level), matching file names against a glob and
//! skipping any directory whose root-relative path contains one of the
//! configured exclusion substrings.

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Discovers files under a root directory.
#[derive(Debug, Clone)]
pub struct PathIndex {
    root: NormalizedPath,
    matcher: GlobMatcher,
    exclude_dirs: Vec<String>,
}

impl PathIndex {
    /// Create an index over `root` matching file names against `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGlob`] if `pattern` is not a valid glob.
    pub fn new(root: impl Into<NormalizedPath>, pattern: &str) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|e| Error::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();

        Ok(Self {
            root: root.into(),
            matcher,
            exclude_dirs: Vec::new(),
        })
    }

    /// Skip directories whose root-relative path contains any of `dirs`.
    pub fn exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs
            .into_iter()
            .map(Into::into)
            .filter(|d: &String| !d.is_empty())
            .collect();
        self
    }

    /// The directory being indexed.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn is_excluded(&self, relative_dir: &str) -> bool {
        self.exclude_dirs
            .iter()
            .any(|xdir| relative_dir.contains(xdir.as_str()))
    }

    /// Discover matching files, returned relative to the index root in
    /// discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the root does not exist. Entries
    /// that cannot be read during the walk are skipped with a warning.
    pub fn discover(&self) -> Result<Vec<NormalizedPath>> {
        let native_root = self.root.to_native();
        if !native_root.exists() {
            return Err(Error::NotFound { path: native_root });
        }

        let walker = WalkDir::new(&native_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&native_root)
                    .map(NormalizedPath::from)
                    .unwrap_or_else(|_| NormalizedPath::from(entry.path()));
                !self.is_excluded(relative.as_str())
            });

        let mut matches = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = %self.root, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matcher.is_match(entry.file_name()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&native_root) {
                matches.push(NormalizedPath::from(relative));
            }
        }

        tracing::debug!(root = %self.root, found = matches.len(), "Discovered files");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn invalid_glob_is_rejected() {
        let result = PathIndex::new(".", "[");
        assert!(matches!(result, Err(Error::InvalidGlob { .. })));
    }

    #[test]
    fn exclusion_is_substring_of_relative_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/.ipynb_checkpoints")).unwrap();
        fs::write(temp.path().join("a/.ipynb_checkpoints/x.ipynb"), "{}").unwrap();
        fs::write(temp.path().join("a/x.ipynb"), "{}").unwrap();

        let index = PathIndex::new(temp.path(), "*.ipynb")
            .unwrap()
            .exclude_dirs(["checkpoints"]);
        let found = index.discover().unwrap();

        assert_eq!(found, vec![NormalizedPath::new("a/x.ipynb")]);
    }
}
