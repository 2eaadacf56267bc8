//! Filesystem layer for gitnb
//!
//! Provides normalized path handling, atomic I/O, recursive notebook
//! discovery and format-agnostic configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod index;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use index::PathIndex;
pub use path::NormalizedPath;
