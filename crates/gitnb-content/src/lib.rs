//! Notebook model, nbpy script codec and diffing for gitnb
//!
//! - [`Notebook`] / [`Cell`]: the structured document, read from and
//!   written to nbformat-4 JSON
//! - [`CellCodec`]: one cell <-> one marker-delimited text block
//! - [`DocumentCodec`]: a whole notebook <-> an nbpy script
//! - [`ScriptDiff`]: unified line diffs between two scripts

pub mod cell;
pub mod diff;
pub mod error;
pub mod notebook;
pub mod script;

pub use cell::{CellCodec, MARKER};
pub use diff::{LineChange, ScriptDiff};
pub use error::{Error, Result};
pub use notebook::{Cell, CellKind, Notebook};
pub use script::{DocumentCodec, FORMAT_VERSION};
