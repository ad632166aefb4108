//! Format trait and implementations for heading scanners.
//!
//! A format supplies the tree-sitter grammar and the query that captures heading text, so
//! other cell markup could be scanned without touching the scanner itself.

pub mod markdown;

use crate::cell::CellKind;

/// A cell markup language the heading scanner can read.
pub trait Format {
    /// Tree-sitter grammar for the markup.
    fn language(&self) -> tree_sitter::Language;
    /// Query whose captures are heading titles.
    fn heading_query(&self) -> &str;

    #[must_use]
    /// Whether cells of this kind carry headings.
    fn scans(&self, kind: CellKind) -> bool {
        kind == CellKind::Markdown
    }
}
