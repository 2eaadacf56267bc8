//! Keeping mirrors in step with their notebooks

mod engine;

pub use engine::{SyncEngine, SyncReport};
