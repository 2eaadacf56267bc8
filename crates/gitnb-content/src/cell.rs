//! Encoding of single cells as marker-delimited text blocks
//!
//! A block is a header line followed by the cell source:
//!
//! ```text
//! #nbpy: cell code {"id":"a1","metadata":{"tags":["slow"]}}
//! for i in range(3):
//!     print(i)
//! ```
//!
//! The JSON object is omitted when the cell has no id, metadata or
//! attachments. Non-empty source is followed by exactly one newline, so
//! a trailing newline in the source shows up as an empty last line.
//! Source lines that could be mistaken for a marker are escaped with a
//! leading backslash.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::notebook::{Cell, CellKind};

/// Prefix shared by every structural line of an nbpy script.
pub const MARKER: &str = "#nbpy:";

/// Keyword introducing a cell header.
pub(crate) const CELL_KEYWORD: &str = "cell";

/// Optional per-cell properties carried on the header line.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CellHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachments: Option<Value>,
}

impl CellHeader {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.metadata.is_empty() && self.attachments.is_none()
    }
}

/// Split a structural line into its keyword and the remainder.
///
/// Returns `None` for lines that are not markers.
pub(crate) fn split_marker(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(MARKER)?.trim_start();
    match rest.find(char::is_whitespace) {
        Some(idx) => Some((&rest[..idx], rest[idx..].trim_start())),
        None => Some((rest, "")),
    }
}

/// Strip the line terminator (`\n` or `\r\n`).
pub(crate) fn trim_eol(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

fn is_plain_kind(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Number of leading backslashes in front of a marker, if the line
/// (after those backslashes) starts with one.
fn marker_escape_depth(line: &str) -> Option<usize> {
    let depth = line.len() - line.trim_start_matches('\\').len();
    line[depth..].starts_with(MARKER).then_some(depth)
}

fn escape_line(line: &str) -> String {
    match marker_escape_depth(line) {
        Some(_) => format!("\\{}", line),
        None => line.to_string(),
    }
}

fn unescape_line(line: &str) -> &str {
    match marker_escape_depth(line) {
        Some(depth) if depth > 0 => &line[1..],
        _ => line,
    }
}

/// Encoder/decoder for single cell blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellCodec;

impl CellCodec {
    /// Encode a cell as a text block ending in a newline.
    ///
    /// Deterministic: equal cells always produce identical blocks.
    pub fn encode(cell: &Cell) -> String {
        let mut block = String::new();
        block.push_str(MARKER);
        block.push(' ');
        block.push_str(CELL_KEYWORD);
        block.push(' ');

        let kind = cell.kind.as_str();
        if is_plain_kind(kind) {
            block.push_str(kind);
        } else {
            // A JSON string never fails to serialize
            block.push_str(&Value::String(kind.to_string()).to_string());
        }

        let header = CellHeader {
            id: cell.id.clone(),
            metadata: cell.metadata.clone(),
            attachments: cell.attachments.clone(),
        };
        if !header.is_empty() {
            block.push(' ');
            block.push_str(&serde_json::to_string(&header).unwrap_or_default());
        }
        block.push('\n');

        let text = cell.source_text();
        if !text.is_empty() {
            for line in text.split('\n') {
                block.push_str(&escape_line(line));
                block.push('\n');
            }
        }
        block
    }

    /// Decode a block produced by [`CellCodec::encode`] (or hand-edited
    /// into the same shape).
    ///
    /// # Errors
    ///
    /// [`Error::MalformedCell`] when the header line is missing or its
    /// kind or JSON cannot be parsed.
    pub fn decode(block: &str) -> Result<Cell> {
        Self::decode_at(block, 0, 1)
    }

    /// Decode a block that sits at cell `index`, starting on `line` of
    /// the enclosing script. Used for error positions.
    pub fn decode_at(block: &str, index: usize, line: usize) -> Result<Cell> {
        let malformed = |message: String| Error::MalformedCell {
            index,
            line,
            message,
        };

        let mut lines = block.split_inclusive('\n');
        let header_line = lines.next().map(trim_eol).unwrap_or_default();

        let rest = match split_marker(header_line) {
            Some((CELL_KEYWORD, rest)) => rest,
            _ => return Err(malformed("missing cell header".to_string())),
        };

        let (kind, json) = parse_kind(rest).map_err(malformed)?;
        let header = if json.is_empty() {
            CellHeader::default()
        } else {
            serde_json::from_str::<CellHeader>(json)
                .map_err(|e| malformed(format!("invalid cell properties: {}", e)))?
        };

        let mut text: String = lines.map(unescape_line).collect();
        if text.ends_with('\n') {
            text.pop();
        }

        let mut cell = Cell::new(kind, "");
        cell.id = header.id;
        cell.metadata = header.metadata;
        cell.attachments = header.attachments;
        cell.set_source(&text);
        Ok(cell)
    }
}

/// Parse the cell kind token and return it with the unparsed remainder.
fn parse_kind(rest: &str) -> std::result::Result<(CellKind, &str), String> {
    if rest.starts_with('"') {
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<String>();
        let name = match stream.next() {
            Some(Ok(name)) => name,
            Some(Err(e)) => return Err(format!("invalid cell kind: {}", e)),
            None => return Err("missing cell kind".to_string()),
        };
        let offset = stream.byte_offset();
        return Ok((CellKind::from_name(&name), rest[offset..].trim_start()));
    }

    let (name, json) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim_start()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err("missing cell kind".to_string());
    }
    Ok((CellKind::from_name(name), json))
}
