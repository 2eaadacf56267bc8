//! Error types for gitnb-core

use std::path::PathBuf;

/// Result type for gitnb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitnb-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path does not exist
    #[error("{path} does not exist")]
    NotFound { path: PathBuf },

    /// Wrong kind of path for the operation, or a path outside the project
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Operation needs a ledger entry that is absent
    #[error("{path} is not tracked")]
    NotTracked { path: PathBuf },

    /// A single ledger entry failed during an update
    #[error("Failed to update mirror of {document}: {source}")]
    Sync {
        document: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Ledger file line that is neither a record, blank nor a comment
    #[error("Ledger error at line {line}: {message}")]
    Ledger { line: usize, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from gitnb-fs
    #[error(transparent)]
    Fs(gitnb_fs::Error),

    /// Notebook or script error from gitnb-content
    #[error(transparent)]
    Content(gitnb_content::Error),

    /// Staging error from gitnb-git
    #[error(transparent)]
    Git(#[from] gitnb_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means notebook or script content did not parse.
    pub fn is_parse(&self) -> bool {
        match self {
            Self::Content(e) => e.is_parse(),
            Self::Sync { source, .. } => source.is_parse(),
            _ => false,
        }
    }
}

// Missing files surface as `NotFound` no matter which layer noticed.
impl From<gitnb_fs::Error> for Error {
    fn from(e: gitnb_fs::Error) -> Self {
        match e {
            gitnb_fs::Error::NotFound { path } => Self::NotFound { path },
            other => Self::Fs(other),
        }
    }
}

impl From<gitnb_content::Error> for Error {
    fn from(e: gitnb_content::Error) -> Self {
        match e {
            gitnb_content::Error::NotFound { path } => Self::NotFound { path },
            other => Self::Content(other),
        }
    }
}
