//! Heading scan: builds the initial section localizer from cell text.
//!
//! Only cells the format scans (markdown by default) are parsed. A heading contributes a section
//! when its text starts with a dotted number such as `1.2.`, optionally wrapped in emphasis
//! markers (`**1.2. Title**`). Lines such as `#1. Title` count as headings too, even though
//! the markdown grammar needs a space after the `#` run.

use crate::cell::Cell;
use crate::error::ScanError;
use crate::formats::Format;
use crate::localizer::SectionLocalizer;
use crate::section_id::SectionId;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Map every numbered heading to the index of the cell it appears in.
///
/// When the same number heads more than one cell, the first one wins.
///
/// # Errors
///
/// Returns an error if the format's grammar or query cannot be loaded, or a cell cannot be parsed.
pub fn scan_sections<C: Cell, F: Format>(
    cells: &[C],
    format: &F,
) -> Result<SectionLocalizer, ScanError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let query = Query::new(&language, format.heading_query())?;

    let mut localizer = SectionLocalizer::new();
    for (index, cell) in cells.iter().enumerate() {
        if !format.scans(cell.kind()) {
            continue;
        }
        for id in heading_ids(&mut parser, &query, cell.source(), index)? {
            if let Some(first) = localizer.get(&id) {
                tracing::warn!(
                    "Section {} heads cell {} but already starts at cell {}; keeping the first",
                    id,
                    index,
                    first
                );
                continue;
            }
            localizer.insert(id, index);
        }
    }

    tracing::debug!("Scanned {} sections from {} cells", localizer.len(), cells.len());
    Ok(localizer)
}

/// Numbered headings in one cell: those the grammar parses first, then any unspaced ones.
fn heading_ids(
    parser: &mut Parser,
    query: &Query,
    text: &str,
    cell: usize,
) -> Result<Vec<SectionId>, ScanError> {
    let tree = parser.parse(text, None).ok_or(ScanError::Parse { cell })?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), text.as_bytes());

    let mut ids = Vec::new();
    while let Some(found) = matches.next() {
        for capture in found.captures {
            let title = capture.node.utf8_text(text.as_bytes())?;
            if let Some(id) = leading_section_id(title) {
                ids.push(id);
            }
        }
    }
    ids.extend(text.lines().filter_map(unspaced_heading_id));
    Ok(ids)
}

/// Section number of a line like `#1. Title`, which the grammar reads as a paragraph because no
/// space follows the `#` run.
fn unspaced_heading_id(line: &str) -> Option<SectionId> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let marked = &line[indent..];
    let title = marked.trim_start_matches('#');
    let level = marked.len() - title.len();
    if indent > 3 || !(1..=6).contains(&level) || !title.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    leading_section_id(title)
}

#[must_use]
/// The dotted number a heading title starts with, if any.
///
/// Leading whitespace and emphasis markers are skipped; the number must end with `.` to count,
/// so `1.2 Results` and `2024 plans` are not sections.
pub fn leading_section_id(title: &str) -> Option<SectionId> {
    let trimmed = title.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '_');
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    SectionId::parse(&trimmed[..end]).ok()
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
