//! Builders for nbformat-4 notebook JSON.
//!
//! Fixtures are written the way Jupyter writes them, outputs and
//! execution counts included, so tests exercise what real notebooks look
//! like on disk rather than what gitnb writes back.

use serde_json::{Map, Value, json};

/// Builds the JSON text of a notebook cell by cell.
///
/// # Example
///
/// ```rust
/// use gitnb_test_utils::NotebookBuilder;
///
/// let json = NotebookBuilder::new()
///     .code("print(1)")
///     .markdown("# Title")
///     .build();
/// assert!(json.contains("\"nbformat\": 4"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotebookBuilder {
    cells: Vec<Value>,
    metadata: Map<String, Value>,
}

/// Split source into the list-of-lines form Jupyter writes.
fn source_lines(source: &str) -> Vec<String> {
    source.split_inclusive('\n').map(str::to_string).collect()
}

impl NotebookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code cell with a stream output and an execution count.
    pub fn code(mut self, source: &str) -> Self {
        let count = self.cells.len() + 1;
        self.cells.push(json!({
            "cell_type": "code",
            "execution_count": count,
            "metadata": {},
            "outputs": [{"name": "stdout", "output_type": "stream", "text": ["out\n"]}],
            "source": source_lines(source),
        }));
        self
    }

    pub fn markdown(mut self, source: &str) -> Self {
        self.cells.push(json!({
            "cell_type": "markdown",
            "metadata": {},
            "source": source_lines(source),
        }));
        self
    }

    pub fn raw(mut self, source: &str) -> Self {
        self.cells.push(json!({
            "cell_type": "raw",
            "metadata": {},
            "source": source_lines(source),
        }));
        self
    }

    /// Add an arbitrary cell object.
    pub fn cell(mut self, cell: Value) -> Self {
        self.cells.push(cell);
        self
    }

    /// Set a notebook-level metadata key.
    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Notebook JSON text.
    pub fn build(self) -> String {
        let notebook = json!({
            "cells": self.cells,
            "metadata": self.metadata,
            "nbformat": 4,
            "nbformat_minor": 5,
        });
        let mut text = serde_json::to_string_pretty(&notebook)
            .unwrap_or_else(|e| panic!("NotebookBuilder::build: {e}"));
        text.push('\n');
        text
    }
}

/// The notebook used throughout the scenario tests: a code cell
/// `print(1)`, a markdown cell `# Title` and an empty code cell.
pub fn three_cell_notebook() -> String {
    NotebookBuilder::new()
        .code("print(1)")
        .markdown("# Title")
        .code("")
        .metadata(
            "kernelspec",
            json!({"display_name": "Python 3", "language": "python", "name": "python3"}),
        )
        .build()
}
