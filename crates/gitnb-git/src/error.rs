//! Error types for gitnb-git

use std::path::PathBuf;

/// Result type for gitnb-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while staging files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] gitnb_fs::Error),

    #[error("Not inside a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },

    #[error("{path} is outside the repository working tree")]
    OutsideWorkTree { path: PathBuf },
}
