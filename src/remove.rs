//! Section removal with renumbering.
//!
//! Removing a section deletes its cells and everything nested beneath it, then renumbers the
//! sections that followed it at the same level so the numbering stays gap-free. Numbers printed
//! inside cell text are patched to match the new identifiers.
//!
//! Each call borrows the caller's cells and localizer and returns fresh ones. A removal is
//! planned completely, including every consistency check, before the first cell is copied, so a
//! failed call has no effect at all.

use crate::cell::Cell;
use crate::error::{BatchError, RemovalError, TopologyIssue};
use crate::localizer::SectionLocalizer;
use crate::section::SectionTree;
use crate::section_id::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Record of one removal, kept for logging and verification by the caller.
pub struct RemovalReport {
    /// The section that was removed.
    pub section: SectionId,
    /// First removed cell (inclusive).
    pub cell_start: usize,
    /// End of the removed cells (exclusive).
    pub cell_end: usize,
    /// The section that bounded the removal, `None` if it ran to the end of the document.
    pub successor: Option<SectionId>,
    /// Identifiers that disappeared with the section, the section itself included.
    pub dropped: Vec<SectionId>,
    /// Sections that were renumbered.
    pub renamed: Vec<Rename>,
}

impl RemovalReport {
    #[must_use]
    /// Number of cells deleted.
    pub fn cells_removed(&self) -> usize {
        self.cell_end - self.cell_start
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A section that received a new number.
pub struct Rename {
    /// Identifier before the removal.
    pub from: SectionId,
    /// Identifier after the removal.
    pub to: SectionId,
    /// Start cell after the removal.
    pub cell: usize,
    /// Whether the old number was found and rewritten in the cell text.
    pub text_patched: bool,
}

#[derive(Debug)]
/// Outcome of removing one section.
pub struct Removal<C> {
    /// Remaining cells, renumbered text included.
    pub cells: Vec<C>,
    /// Localizer describing `cells`.
    pub localizer: SectionLocalizer,
    /// What was removed and renamed.
    pub report: RemovalReport,
}

#[derive(Debug)]
/// Outcome of removing a set of sections.
pub struct BatchRemoval<C> {
    /// Remaining cells.
    pub cells: Vec<C>,
    /// Localizer describing `cells`.
    pub localizer: SectionLocalizer,
    /// One report per removal, in processing order.
    pub reports: Vec<RemovalReport>,
}

/// Everything a removal will do, computed without touching any cell.
struct Plan {
    range: Range<usize>,
    successor: Option<SectionId>,
    dropped: Vec<SectionId>,
    /// Old id, new id and new start cell, in ascending order of the old id.
    renames: Vec<(SectionId, SectionId, usize)>,
    localizer: SectionLocalizer,
}

#[derive(Clone, Copy, Debug)]
/// Removal settings.
pub struct Remover {
    patch_text: bool,
}

impl Default for Remover {
    fn default() -> Self {
        Self { patch_text: true }
    }
}

impl Remover {
    #[must_use]
    /// A remover that patches cell text.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Whether renumbered sections also get the number in their cell text rewritten.
    pub fn patch_text(mut self, patch_text: bool) -> Self {
        self.patch_text = patch_text;
        self
    }

    /// Remove `target` and everything nested in it, then renumber what followed.
    ///
    /// The removed range runs from the target's first cell up to the first cell of the next
    /// section at the same level or above, or to the end of the document if there is none.
    ///
    /// # Errors
    ///
    /// - [`RemovalError::UnknownSection`] if `target` is not in the localizer.
    /// - [`RemovalError::MalformedIdentifier`] if a successor identifier cannot be formed.
    /// - [`RemovalError::UnsupportedTopology`] if the localizer disagrees with the cells about
    ///   where sections start.
    pub fn remove_section<C: Cell + Clone>(
        &self,
        cells: &[C],
        localizer: &SectionLocalizer,
        target: &SectionId,
    ) -> Result<Removal<C>, RemovalError> {
        let plan = plan_removal(localizer, cells.len(), target)?;
        let Range { start, end } = plan.range.clone();

        let mut remaining = Vec::with_capacity(cells.len() - (end - start));
        remaining.extend_from_slice(&cells[..start]);
        remaining.extend_from_slice(&cells[end..]);

        let mut renamed = Vec::with_capacity(plan.renames.len());
        for (from, to, cell) in plan.renames {
            let text_patched = self.patch_text && patch_cell(&mut remaining[cell], &from, &to);
            tracing::debug!(
                "Renumbered {} -> {} (cell {}, patched: {})",
                from,
                to,
                cell,
                text_patched
            );
            renamed.push(Rename {
                from,
                to,
                cell,
                text_patched,
            });
        }

        tracing::info!(
            "Removed section {} (cells {}..{}, {} renumbered)",
            target,
            start,
            end,
            renamed.len()
        );

        Ok(Removal {
            cells: remaining,
            localizer: plan.localizer,
            report: RemovalReport {
                section: target.clone(),
                cell_start: start,
                cell_end: end,
                successor: plan.successor,
                dropped: plan.dropped,
                renamed,
            },
        })
    }

    /// Remove every section in `targets`, latest first.
    ///
    /// Targets are sorted by their numeric segments in descending order. Removing a later section
    /// never moves or renumbers an earlier one, so every identifier still means what the caller
    /// meant when its turn comes. Duplicates are removed once.
    ///
    /// # Errors
    ///
    /// Stops at the first failing removal. The returned [`BatchError`] carries the state after
    /// the removals that did succeed.
    pub fn remove_sections<C, I>(
        &self,
        cells: &[C],
        localizer: &SectionLocalizer,
        targets: I,
    ) -> Result<BatchRemoval<C>, BatchError<C>>
    where
        C: Cell + Clone,
        I: IntoIterator<Item = SectionId>,
    {
        let ordered: BTreeSet<SectionId> = targets.into_iter().collect();
        for (nested, ancestor) in nested_targets(&ordered) {
            tracing::warn!(
                "Section {} is nested in {}, which is also being removed",
                nested,
                ancestor
            );
        }

        let mut cells = cells.to_vec();
        let mut localizer = localizer.clone();
        let mut reports: Vec<RemovalReport> = Vec::with_capacity(ordered.len());

        for target in ordered.into_iter().rev() {
            match self.remove_section(&cells, &localizer, &target) {
                Ok(removal) => {
                    cells = removal.cells;
                    localizer = removal.localizer;
                    reports.push(removal.report);
                }
                Err(source) => {
                    tracing::warn!("Batch removal stopped at {}: {}", target, source);
                    return Err(BatchError {
                        failed: target,
                        source,
                        committed: reports.into_iter().map(|report| report.section).collect(),
                        cells,
                        localizer,
                    });
                }
            }
        }

        Ok(BatchRemoval {
            cells,
            localizer,
            reports,
        })
    }
}

/// Remove one section with text patching enabled.
///
/// # Errors
///
/// See [`Remover::remove_section`].
pub fn remove_section<C: Cell + Clone>(
    cells: &[C],
    localizer: &SectionLocalizer,
    target: &SectionId,
) -> Result<Removal<C>, RemovalError> {
    Remover::default().remove_section(cells, localizer, target)
}

/// Remove a set of sections with text patching enabled.
///
/// # Errors
///
/// See [`Remover::remove_sections`].
pub fn remove_sections<C, I>(
    cells: &[C],
    localizer: &SectionLocalizer,
    targets: I,
) -> Result<BatchRemoval<C>, BatchError<C>>
where
    C: Cell + Clone,
    I: IntoIterator<Item = SectionId>,
{
    Remover::default().remove_sections(cells, localizer, targets)
}

/// Requested targets that another requested target already covers, paired with their outermost
/// requested ancestor.
fn nested_targets(targets: &BTreeSet<SectionId>) -> Vec<(&SectionId, &SectionId)> {
    targets
        .iter()
        .filter_map(|target| {
            targets
                .iter()
                .find(|other| other.is_ancestor_of(target))
                .map(|ancestor| (target, ancestor))
        })
        .collect()
}

/// First recorded section among the target's successors: its next sibling, else its parent's
/// next sibling, and so on outward.
fn resolve_successor(
    localizer: &SectionLocalizer,
    target: &SectionId,
) -> Result<Option<SectionId>, RemovalError> {
    Ok(target
        .successors()?
        .into_iter()
        .find(|candidate| localizer.contains(candidate)))
}

fn plan_removal(
    localizer: &SectionLocalizer,
    cell_count: usize,
    target: &SectionId,
) -> Result<Plan, RemovalError> {
    let start = localizer
        .get(target)
        .ok_or_else(|| RemovalError::UnknownSection(target.clone()))?;
    let tree = SectionTree::build(localizer, cell_count)?;
    let node = tree
        .find(target)
        .ok_or_else(|| RemovalError::UnknownSection(target.clone()))?;

    let successor = resolve_successor(localizer, target)?;
    let end = successor
        .as_ref()
        .and_then(|id| localizer.get(id))
        .unwrap_or(cell_count);
    let range = start..end;
    tracing::debug!("Section {} spans cells {:?} (successor: {:?})", target, range, successor);

    if end <= start {
        return Err(unsupported(target, TopologyIssue::EmptyRange { range }));
    }

    for section in tree.sections() {
        let nested = target.contains(&section.id);
        let inside = range.contains(&section.cell_start);
        if nested && !inside {
            return Err(unsupported(
                &section.id,
                TopologyIssue::DescendantOutsideRange {
                    range: range.clone(),
                },
            ));
        }
        if !nested && inside {
            return Err(unsupported(
                &section.id,
                TopologyIssue::ForeignSectionInRange {
                    range: range.clone(),
                },
            ));
        }
    }

    // Later siblings move up one place, carrying their whole subtree with them.
    let level = target.depth() - 1;
    let branch = &target.segments()[..level];
    let mut new_ids = BTreeMap::new();
    for &sibling in tree.later_siblings(node) {
        let sibling_id = &tree.sections()[sibling].id;
        if sibling_id.depth() <= level || &sibling_id.segments()[..level] != branch {
            continue;
        }
        for member in tree.subtree(sibling) {
            let old = &tree.sections()[member].id;
            let position = old.segments()[level];
            new_ids.insert(old.clone(), old.with_segment(level, position - 1));
        }
    }

    let removed = end - start;
    let mut dropped = Vec::new();
    let mut renames = Vec::with_capacity(new_ids.len());
    let mut updated = SectionLocalizer::new();
    for (id, cell) in localizer.iter() {
        if target.contains(id) {
            dropped.push(id.clone());
            continue;
        }
        let cell = if cell >= end { cell - removed } else { cell };
        match new_ids.remove(id) {
            Some(new_id) => {
                renames.push((id.clone(), new_id.clone(), cell));
                updated.insert(new_id, cell);
            }
            None => {
                updated.insert(id.clone(), cell);
            }
        }
    }

    Ok(Plan {
        range,
        successor,
        dropped,
        renames,
        localizer: updated,
    })
}

fn unsupported(section: &SectionId, reason: TopologyIssue) -> RemovalError {
    RemovalError::UnsupportedTopology {
        section: section.clone(),
        reason,
    }
}

/// Rewrite the first standalone occurrence of `from` in the cell text as `to`.
fn patch_cell<C: Cell>(cell: &mut C, from: &SectionId, to: &SectionId) -> bool {
    match replace_first_identifier(cell.source(), &from.to_string(), &to.to_string()) {
        Some(patched) => {
            cell.set_source(patched);
            true
        }
        None => false,
    }
}

/// Replace the first occurrence of `old` that is not part of a longer identifier.
///
/// A match preceded by a digit or `.` (the tail of `13.` or `2.3.`) or followed by a digit (the
/// head of `1.2.3.`) is skipped.
#[must_use]
pub fn replace_first_identifier(text: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(offset) = text[from..].find(old) {
        let at = from + offset;
        let after = at + old.len();
        let joined_before = text[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit() || c == '.');
        let joined_after = text[after..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());

        if !joined_before && !joined_after {
            let mut patched = String::with_capacity(text.len() - old.len() + new.len());
            patched.push_str(&text[..at]);
            patched.push_str(new);
            patched.push_str(&text[after..]);
            return Some(patched);
        }

        // Step past the first character of the rejected match.
        from = at + text[at..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

#[cfg(test)]
#[path = "tests/remove.rs"]
mod tests;
