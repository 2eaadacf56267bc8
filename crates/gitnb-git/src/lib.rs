//! Git integration for gitnb
//!
//! Staging newly written mirrors is the only git operation gitnb performs.
//! It sits behind the [`Stager`] trait so the core can run without a
//! repository.

pub mod error;
pub mod stager;

pub use error::{Error, Result};
pub use stager::{GitStager, RecordingStager, Stager};
