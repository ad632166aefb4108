//! Document-level orchestration: scan headings, look up the configured removals, remove them.
//!
//! A document either comes out fully transformed or not at all; every failure is reported with
//! the document name and, where there is one, the offending section.

use crate::cell::Cell;
use crate::config::Config;
use crate::error::TransformError;
use crate::formats::Format;
use crate::input;
use crate::localizer::SectionLocalizer;
use crate::remove::{RemovalReport, Remover};

#[derive(Debug)]
/// A transformed document.
pub struct Transformed<C> {
    /// Cells with the configured sections removed and the rest renumbered.
    pub cells: Vec<C>,
    /// Localizer describing `cells`.
    pub localizer: SectionLocalizer,
    /// One report per removed section, in processing order.
    pub reports: Vec<RemovalReport>,
}

/// Remove the sections configured for `document` from its cells.
///
/// A document without an entry in the configuration comes back unchanged.
///
/// # Errors
///
/// Returns an error if headings cannot be scanned, a configured identifier is malformed, or any
/// removal fails. No partial result is returned.
pub fn transform_document<C, F>(
    document: &str,
    cells: &[C],
    config: &Config,
    format: &F,
) -> Result<Transformed<C>, TransformError>
where
    C: Cell + Clone,
    F: Format,
{
    let _span = tracing::info_span!("transform", document).entered();

    let localizer =
        input::scan_sections(cells, format).map_err(|source| TransformError::Scan {
            document: document.to_string(),
            source,
        })?;

    let targets = config
        .removals_for(document)
        .map_err(|source| TransformError::Config {
            document: document.to_string(),
            source,
        })?;

    let batch = Remover::new()
        .patch_text(config.patch_text)
        .remove_sections(cells, &localizer, targets)
        .map_err(|e| TransformError::Removal {
            document: document.to_string(),
            section: e.failed,
            source: e.source,
        })?;

    tracing::info!(
        "Transformed {}: removed {} sections, {} cells remain",
        document,
        batch.reports.len(),
        batch.cells.len()
    );

    Ok(Transformed {
        cells: batch.cells,
        localizer: batch.localizer,
        reports: batch.reports,
    })
}

#[cfg(test)]
#[path = "tests/transform.rs"]
mod tests;
