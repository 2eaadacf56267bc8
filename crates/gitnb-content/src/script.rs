//! Whole-notebook conversion to and from nbpy scripts
//!
//! ```text
//! #nbpy: format 1
//! #nbpy: notebook {"metadata":{},"nbformat":4,"nbformat_minor":5}
//! #nbpy: cell code
//! print(1)
//! #nbpy: cell markdown
//! # Title
//! ```
//!
//! The `format` line must come first and appear once. The `notebook`
//! line is optional on input (a hand-written script gets nbformat 4.5
//! with empty metadata) but always written. Blank lines before the
//! first cell are tolerated; any other text there is an error.

use gitnb_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cell::{CELL_KEYWORD, CellCodec, MARKER, split_marker, trim_eol};
use crate::error::{Error, Result};
use crate::notebook::Notebook;

/// Version written to and accepted from the `format` header.
pub const FORMAT_VERSION: u32 = 1;

const FORMAT_KEYWORD: &str = "format";
const NOTEBOOK_KEYWORD: &str = "notebook";

/// Notebook-level properties carried on the `notebook` header line.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotebookHeader {
    #[serde(default)]
    metadata: Map<String, Value>,
    nbformat: u32,
    nbformat_minor: u32,
}

/// Converter between [`Notebook`]s and nbpy script text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentCodec;

impl DocumentCodec {
    /// Render a notebook as script text.
    ///
    /// Rendering a freshly parsed script reproduces it byte for byte, so
    /// callers can detect "nothing changed" by plain comparison.
    pub fn render(notebook: &Notebook) -> String {
        let header = NotebookHeader {
            metadata: notebook.metadata.clone(),
            nbformat: notebook.nbformat,
            nbformat_minor: notebook.nbformat_minor,
        };

        let mut script = format!("{} {} {}\n", MARKER, FORMAT_KEYWORD, FORMAT_VERSION);
        script.push_str(&format!(
            "{} {} {}\n",
            MARKER,
            NOTEBOOK_KEYWORD,
            serde_json::to_string(&header).unwrap_or_default()
        ));
        for cell in &notebook.cells {
            script.push_str(&CellCodec::encode(cell));
        }
        script
    }

    /// Parse script text back into a notebook.
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`] for a missing or repeated `format` header, a
    ///   misplaced or invalid `notebook` header, unknown marker keywords
    ///   and stray text before the first cell
    /// - [`Error::VersionMismatch`] for an unsupported format version
    /// - [`Error::MalformedCell`] for a cell block that cannot be decoded
    pub fn parse(script: &str) -> Result<Notebook> {
        // Editors on some platforms save with a byte order mark
        let script = script.strip_prefix('\u{feff}').unwrap_or(script);
        let mut parser = ScriptParser::default();
        for (idx, line) in script.split_inclusive('\n').enumerate() {
            parser.feed(idx + 1, line)?;
        }
        parser.finish()
    }

    /// Read the notebook at `path` and render it as a script.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file is absent, [`Error::Parse`] if it
    /// is not a valid notebook.
    pub fn notebook_to_script(path: &NormalizedPath) -> Result<String> {
        let notebook = Notebook::read(path)?;
        tracing::debug!(path = %path, cells = notebook.cells.len(), "Rendering notebook as script");
        Ok(Self::render(&notebook))
    }

    /// Read the script at `path` and parse it into a notebook.
    pub fn script_to_notebook(path: &NormalizedPath) -> Result<Notebook> {
        let script = io::read_text(path)?;
        tracing::debug!(path = %path, "Parsing script");
        Self::parse(&script)
    }
}

fn script_error(line: usize, message: impl std::fmt::Display) -> Error {
    Error::parse("nbpy", format!("line {}: {}", line, message))
}

#[derive(Default)]
struct ScriptParser {
    seen_format: bool,
    header: Option<NotebookHeader>,
    notebook: Notebook,
    /// Start line and accumulated text of the cell being read
    current: Option<(usize, String)>,
}

impl ScriptParser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some((keyword, rest)) = split_marker(trim_eol(line)) else {
            return self.feed_text(line_no, line);
        };

        match keyword {
            FORMAT_KEYWORD => {
                if self.seen_format {
                    return Err(script_error(line_no, "duplicate format header"));
                }
                if self.header.is_some() || self.current.is_some() {
                    return Err(script_error(line_no, "format header must come first"));
                }
                let version = rest.trim();
                if version.parse::<u32>().ok() != Some(FORMAT_VERSION) {
                    return Err(Error::VersionMismatch {
                        found: version.to_string(),
                        supported: FORMAT_VERSION,
                    });
                }
                self.seen_format = true;
            }
            NOTEBOOK_KEYWORD => {
                self.require_format(line_no)?;
                if self.header.is_some() {
                    return Err(script_error(line_no, "duplicate notebook header"));
                }
                if self.current.is_some() {
                    return Err(script_error(line_no, "notebook header after first cell"));
                }
                let header: NotebookHeader = serde_json::from_str(rest)
                    .map_err(|e| script_error(line_no, format!("invalid notebook header: {}", e)))?;
                self.header = Some(header);
            }
            CELL_KEYWORD => {
                self.require_format(line_no)?;
                self.flush()?;
                self.current = Some((line_no, line.to_string()));
            }
            other => {
                return Err(script_error(
                    line_no,
                    format!("unknown marker '{} {}'", MARKER, other),
                ));
            }
        }
        Ok(())
    }

    fn feed_text(&mut self, line_no: usize, line: &str) -> Result<()> {
        if let Some((_, block)) = self.current.as_mut() {
            block.push_str(line);
            return Ok(());
        }
        if line.trim().is_empty() {
            return Ok(());
        }
        self.require_format(line_no)?;
        Err(script_error(line_no, "text outside of a cell"))
    }

    fn require_format(&self, line_no: usize) -> Result<()> {
        if self.seen_format {
            Ok(())
        } else {
            Err(script_error(line_no, "missing format header"))
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some((start, block)) = self.current.take() {
            let index = self.notebook.cells.len();
            let cell = CellCodec::decode_at(&block, index, start)?;
            self.notebook.cells.push(cell);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Notebook> {
        if !self.seen_format {
            return Err(script_error(1, "missing format header"));
        }
        self.flush()?;
        if let Some(header) = self.header {
            self.notebook.metadata = header.metadata;
            self.notebook.nbformat = header.nbformat;
            self.notebook.nbformat_minor = header.nbformat_minor;
        }
        Ok(self.notebook)
    }
}
