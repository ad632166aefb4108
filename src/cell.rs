//! Notebook cells as seen by the remover.
//!
//! The remover only ever reads and rewrites a cell's text; everything else about a cell is
//! opaque to it. [`NotebookCell`] is the nbformat-shaped implementation used by the orchestrator.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Cell type tag.
pub enum CellKind {
    /// Executable code.
    Code,
    /// Markdown prose; the only kind scanned for headings.
    Markdown,
    /// Unrendered text.
    Raw,
}

/// An ordered unit of document content with mutable text.
pub trait Cell {
    /// Current text of the cell.
    fn source(&self) -> &str;
    /// Replace the text of the cell.
    fn set_source(&mut self, source: String);
    /// Cell type tag.
    fn kind(&self) -> CellKind;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A notebook cell in nbformat's JSON shape.
///
/// Fields the remover does not care about (outputs, execution counts, ids) are carried through
/// untouched in `extra`.
pub struct NotebookCell {
    /// Cell type tag.
    pub cell_type: CellKind,
    /// Cell text. nbformat allows a list of lines on input; it is always written as one string.
    #[serde(deserialize_with = "source_text")]
    pub source: String,
    /// Cell metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Remaining nbformat fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotebookCell {
    #[must_use]
    /// A markdown cell with empty metadata.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    #[must_use]
    /// A code cell with empty metadata.
    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    fn new(cell_type: CellKind, source: impl Into<String>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            metadata: Map::new(),
            extra: Map::new(),
        }
    }
}

impl Cell for NotebookCell {
    fn source(&self) -> &str {
        &self.source
    }

    fn set_source(&mut self, source: String) {
        self.source = source;
    }

    fn kind(&self) -> CellKind {
        self.cell_type
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceText {
    Text(String),
    Lines(Vec<String>),
}

fn source_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match SourceText::deserialize(deserializer)? {
        SourceText::Text(text) => text,
        // nbformat lines keep their own trailing newlines.
        SourceText::Lines(lines) => lines.concat(),
    })
}

#[cfg(test)]
#[path = "tests/cell.rs"]
mod tests;
