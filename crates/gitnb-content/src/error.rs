//! Error types for gitnb-content

use std::path::PathBuf;

/// Result type for gitnb-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, writing or converting notebooks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path} does not exist")]
    NotFound { path: PathBuf },

    #[error("Failed to parse {format} content: {message}")]
    Parse { format: String, message: String },

    #[error("Malformed cell #{index} at line {line}: {message}")]
    MalformedCell {
        index: usize,
        line: usize,
        message: String,
    },

    #[error("Unsupported nbpy format version '{found}' (supported: {supported})")]
    VersionMismatch { found: String, supported: u32 },

    #[error(transparent)]
    Fs(gitnb_fs::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the content did not match its grammar.
    ///
    /// Malformed cells and unknown format versions are both parse
    /// failures from the caller's point of view.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::MalformedCell { .. } | Self::VersionMismatch { .. }
        )
    }
}

impl From<gitnb_fs::Error> for Error {
    fn from(e: gitnb_fs::Error) -> Self {
        match e {
            gitnb_fs::Error::NotFound { path } => Self::NotFound { path },
            other => Self::Fs(other),
        }
    }
}
