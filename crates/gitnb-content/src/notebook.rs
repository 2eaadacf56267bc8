//! Notebook document model
//!
//! A [`Notebook`] is an ordered sequence of [`Cell`]s plus notebook-level
//! metadata, read from and written to Jupyter nbformat-4 JSON.
//!
//! Cell outputs and execution counts are not part of the model. They are
//! dropped on read and written back empty (`"outputs": []`,
//! `"execution_count": null`).

use gitnb_fs::{NormalizedPath, io};
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};

/// Lowest nbformat major version that has a flat `cells` list.
const MIN_NBFORMAT: u32 = 4;

/// The kind of a notebook cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
    /// Any cell type this tool has no special handling for
    Other(String),
}

impl CellKind {
    /// Map an nbformat `cell_type` string to a kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "code" => Self::Code,
            "markdown" => Self::Markdown,
            "raw" => Self::Raw,
            other => Self::Other(other.to_string()),
        }
    }

    /// The nbformat `cell_type` string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split source text into newline-terminated lines.
///
/// The last line keeps no terminator unless the text ends with one.
/// Empty text yields no lines.
pub fn split_source(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    /// nbformat 4.5 cell id
    pub id: Option<String>,
    pub metadata: Map<String, Value>,
    /// Inline attachments of markdown/raw cells
    pub attachments: Option<Value>,
    source: Vec<String>,
}

impl Cell {
    /// Create a cell of `kind` from source text.
    pub fn new(kind: CellKind, source: &str) -> Self {
        Self {
            kind,
            id: None,
            metadata: Map::new(),
            attachments: None,
            source: split_source(source),
        }
    }

    pub fn code(source: &str) -> Self {
        Self::new(CellKind::Code, source)
    }

    pub fn markdown(source: &str) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    pub fn raw(source: &str) -> Self {
        Self::new(CellKind::Raw, source)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_attachments(mut self, attachments: Value) -> Self {
        self.attachments = Some(attachments);
        self
    }

    /// Source lines, each newline-terminated except possibly the last.
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// The full source text.
    pub fn source_text(&self) -> String {
        self.source.concat()
    }

    /// Replace the source text.
    pub fn set_source(&mut self, text: &str) {
        self.source = split_source(text);
    }

    fn to_json_value(&self) -> Value {
        let mut cell = Map::new();
        cell.insert("cell_type".into(), json!(self.kind.as_str()));
        if let Some(id) = &self.id {
            cell.insert("id".into(), json!(id));
        }
        cell.insert("metadata".into(), Value::Object(self.metadata.clone()));
        cell.insert("source".into(), json!(self.source));
        if let Some(attachments) = &self.attachments {
            cell.insert("attachments".into(), attachments.clone());
        }
        if self.kind == CellKind::Code {
            cell.insert("execution_count".into(), Value::Null);
            cell.insert("outputs".into(), json!([]));
        }
        Value::Object(cell)
    }
}

/// A notebook document.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub nbformat: u32,
    pub nbformat_minor: u32,
    pub metadata: Map<String, Value>,
    pub cells: Vec<Cell>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for RawSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    attachments: Option<Value>,
    #[serde(default)]
    source: RawSource,
}

#[derive(Deserialize)]
struct RawNotebook {
    nbformat: u32,
    #[serde(default)]
    nbformat_minor: u32,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    cells: Option<Vec<RawCell>>,
}

impl Notebook {
    /// Create an empty nbformat 4.5 notebook.
    pub fn new() -> Self {
        Self {
            nbformat: 4,
            nbformat_minor: 5,
            metadata: Map::new(),
            cells: Vec::new(),
        }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Parse nbformat JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not JSON, lacks required
    /// fields, or is an nbformat older than 4.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawNotebook =
            serde_json::from_str(text).map_err(|e| Error::parse("notebook", e.to_string()))?;

        if raw.nbformat < MIN_NBFORMAT {
            return Err(Error::parse(
                "notebook",
                format!(
                    "nbformat {} is not supported (need {} or newer)",
                    raw.nbformat, MIN_NBFORMAT
                ),
            ));
        }
        let cells = raw
            .cells
            .ok_or_else(|| Error::parse("notebook", "missing field `cells`"))?;

        Ok(Self {
            nbformat: raw.nbformat,
            nbformat_minor: raw.nbformat_minor,
            metadata: raw.metadata,
            cells: cells
                .into_iter()
                .map(|raw_cell| Cell {
                    kind: CellKind::from_name(&raw_cell.cell_type),
                    id: raw_cell.id,
                    metadata: raw_cell.metadata,
                    attachments: raw_cell.attachments,
                    source: split_source(&raw_cell.source.into_text()),
                })
                .collect(),
        })
    }

    /// Serialize as nbformat JSON: one-space indent, sorted keys and a
    /// trailing newline, the layout Jupyter itself writes.
    pub fn to_json(&self) -> Result<String> {
        let value = json!({
            "cells": self.cells.iter().map(Cell::to_json_value).collect::<Vec<_>>(),
            "metadata": self.metadata,
            "nbformat": self.nbformat,
            "nbformat_minor": self.nbformat_minor,
        });

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        buf.push(b'\n');

        String::from_utf8(buf).map_err(|e| Error::parse("notebook", e.to_string()))
    }

    /// Read a notebook file.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file is absent, [`Error::Parse`] if it
    /// is not a valid notebook.
    pub fn read(path: &NormalizedPath) -> Result<Self> {
        let text = io::read_text(path)?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Parse { format, message } => Error::Parse {
                format,
                message: format!("{}: {}", path, message),
            },
            other => other,
        })
    }

    /// Write the notebook atomically.
    pub fn write(&self, path: &NormalizedPath) -> Result<()> {
        io::write_text(path, &self.to_json()?)?;
        Ok(())
    }
}
