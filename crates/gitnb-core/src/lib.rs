//! Core of gitnb: tracking notebooks through plain-text mirrors
//!
//! This crate ties the lower crates together:
//!
//! - **Project**: a root directory with its [`GitnbConfig`] and ledger
//! - **Ledger**: the persisted notebook-to-mirror mapping
//! - **SyncEngine**: regenerates mirrors, rewriting only what changed
//! - **diff**: compares a notebook with its last-synced mirror
//! - **batch** / **convert**: file-or-directory operations
//!
//! # Architecture
//!
//! ```text
//!                    gitnb-cli
//!                        |
//!                   gitnb-core
//!                        |
//!        +---------------+---------------+
//!        |               |               |
//!    gitnb-fs      gitnb-content     gitnb-git
//! ```
//!
//! Concurrent invocations against one project are not supported: ledger
//! mutations are read-modify-write. Individual writes are atomic.

pub mod batch;
pub mod config;
pub mod convert;
pub mod diff;
pub mod error;
pub mod gitignore;
pub mod ledger;
pub mod project;
pub mod sync;

pub use batch::{BatchReport, ResolvedInputs, add_path, remove_path, resolve_inputs};
pub use config::GitnbConfig;
pub use convert::{Converted, tonb, topy};
pub use diff::{MirrorDiff, diff_against_mirror};
pub use error::{Error, Result};
pub use gitignore::GitignoreOutcome;
pub use ledger::{Ledger, TrackedEntry};
pub use project::{AddOutcome, Project};
pub use sync::{SyncEngine, SyncReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_tracked_displays_path() {
        let error = Error::NotTracked {
            path: PathBuf::from("notebooks/a.ipynb"),
        };
        assert_eq!(error.to_string(), "notebooks/a.ipynb is not tracked");
    }

    #[test]
    fn sync_error_keeps_source() {
        let error = Error::Sync {
            document: PathBuf::from("a.ipynb"),
            source: Box::new(Error::NotFound {
                path: PathBuf::from("a.ipynb"),
            }),
        };
        assert!(error.to_string().contains("a.ipynb does not exist"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
