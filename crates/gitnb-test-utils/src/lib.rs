//! Shared test utilities for the gitnb workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures
//! - [`notebook`]: nbformat JSON builders
//! - [`project`]: [`TestProject`] scratch directory with file helpers

pub mod git;
pub mod notebook;
pub mod project;

pub use notebook::NotebookBuilder;
pub use project::TestProject;
