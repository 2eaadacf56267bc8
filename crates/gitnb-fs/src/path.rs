//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Ledger entries, discovery results and mirror paths are all compared
/// as strings, so every path is normalized on the way in: backslashes
/// become forward slashes and redundant leading `./` segments are
/// dropped. Conversion to a platform-native path happens only at I/O
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.trim_start_matches('/').to_string();
        }
        if normalized.is_empty() {
            normalized.push('.');
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Whether this is the current-directory path `.`.
    pub fn is_current_dir(&self) -> bool {
        self.inner == "."
    }

    /// Join this path with a segment.
    ///
    /// Joining onto `.` yields the segment itself, so relative results
    /// never carry a `./` prefix.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if self.is_current_dir() {
            return Self::new(segment_normalized);
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next()
    }

    /// Strip a directory prefix, returning the remainder.
    ///
    /// Matches whole segments only: `nbpy` is a prefix of `nbpy/a.py`
    /// but not of `nbpy2/a.py`.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<Self> {
        if base.is_current_dir() {
            return Some(self.clone());
        }
        let base = base.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?;
        if rest.is_empty() {
            return Some(Self::new("."));
        }
        let rest = rest.strip_prefix('/')?;
        Some(Self::new(rest))
    }

    /// Strip a literal suffix from the final component, e.g. `.ipynb`.
    pub fn strip_suffix(&self, suffix: &str) -> Option<Self> {
        let stem = self.inner.strip_suffix(suffix)?;
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(Self {
            inner: stem.to_string(),
        })
    }

    /// Append a literal suffix to the final component.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            inner: format!("{}{}", self.inner, suffix),
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this path is absolute on the current platform.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || self.to_native().is_absolute()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
