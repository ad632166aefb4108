//! Explicit section tree derived from a localizer.
//!
//! Dotted identifiers describe a tree only implicitly. Building the tree once up front lets the
//! remover reason about subtrees and siblings directly, and rejects localizers whose positions
//! contradict their nesting before any cell is touched.

use crate::error::{RemovalError, TopologyIssue};
use crate::localizer::SectionLocalizer;
use crate::section_id::SectionId;

#[derive(Clone, Debug)]
/// Node in the section tree.
pub struct Section {
    /// Dotted identifier of this section.
    pub id: SectionId,
    /// Index of the first cell belonging to this section.
    pub cell_start: usize,
    /// Index of the enclosing section in the tree arena.
    pub parent_index: Option<usize>,
    /// Indices of directly nested sections, in document order.
    pub children_indices: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
/// Arena of sections plus the top-level entry points.
///
/// A section whose parent identifier is missing from the localizer hangs off its nearest
/// recorded ancestor (or the root), so numbering gaps never break the tree.
pub struct SectionTree {
    sections: Vec<Section>,
    roots: Vec<usize>,
}

impl SectionTree {
    /// Build the tree for a document of `cell_count` cells.
    ///
    /// # Errors
    ///
    /// Returns [`RemovalError::UnsupportedTopology`] if a section starts past the last cell or
    /// before the section that encloses it.
    pub fn build(localizer: &SectionLocalizer, cell_count: usize) -> Result<Self, RemovalError> {
        let mut tree = Self::default();
        let mut open: Vec<usize> = Vec::new();

        for (id, cell_start) in localizer.iter() {
            if cell_start >= cell_count {
                return Err(RemovalError::UnsupportedTopology {
                    section: id.clone(),
                    reason: TopologyIssue::StartOutOfBounds {
                        start: cell_start,
                        len: cell_count,
                    },
                });
            }

            while let Some(&top) = open.last() {
                if tree.sections[top].id.is_ancestor_of(id) {
                    break;
                }
                open.pop();
            }

            let parent_index = open.last().copied();
            if let Some(parent) = parent_index {
                let parent = &tree.sections[parent];
                if parent.cell_start > cell_start {
                    return Err(RemovalError::UnsupportedTopology {
                        section: id.clone(),
                        reason: TopologyIssue::ChildBeforeParent {
                            parent: parent.id.clone(),
                        },
                    });
                }
            }

            let index = tree.sections.len();
            tree.sections.push(Section {
                id: id.clone(),
                cell_start,
                parent_index,
                children_indices: Vec::new(),
            });
            match parent_index {
                Some(parent) => tree.sections[parent].children_indices.push(index),
                None => tree.roots.push(index),
            }
            open.push(index);
        }

        Ok(tree)
    }

    #[must_use]
    /// All sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Top-level sections in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    /// Arena index of `id`.
    pub fn find(&self, id: &SectionId) -> Option<usize> {
        // Arena order is identifier order.
        self.sections
            .binary_search_by(|section| section.id.cmp(id))
            .ok()
    }

    #[must_use]
    /// Sections sharing `index`'s parent that come after it.
    pub fn later_siblings(&self, index: usize) -> &[usize] {
        let siblings = match self.sections[index].parent_index {
            Some(parent) => &self.sections[parent].children_indices,
            None => &self.roots,
        };
        match siblings.iter().position(|&sibling| sibling == index) {
            Some(position) => &siblings[position + 1..],
            None => &[],
        }
    }

    #[must_use]
    /// `index` and everything nested beneath it, in document order.
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        let mut collected = Vec::new();
        let mut pending = vec![index];
        while let Some(next) = pending.pop() {
            collected.push(next);
            pending.extend(self.sections[next].children_indices.iter().rev());
        }
        collected
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
