//! The section localizer: where each numbered section starts in the cell sequence.
//!
//! Only start cells are stored. A section's end is derived on demand from the start of whatever
//! follows it, so there is never a second copy of the boundaries to drift out of sync.

use crate::error::SectionIdError;
use crate::section_id::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Map from section identifier to the index of the section's first cell.
///
/// Removals take a localizer by reference and return a new one, so a value can be kept as a
/// snapshot and replayed against.
pub struct SectionLocalizer {
    starts: BTreeMap<SectionId, usize>,
}

impl SectionLocalizer {
    #[must_use]
    /// An empty localizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string keys, as produced by a heading scan or a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error for the first key that is not a valid identifier.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, SectionIdError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(id, cell)| SectionId::parse(id.as_ref()).map(|id| (id, cell)))
            .collect()
    }

    /// Record where `id` starts, returning the previous start if there was one.
    pub fn insert(&mut self, id: SectionId, cell: usize) -> Option<usize> {
        self.starts.insert(id, cell)
    }

    #[must_use]
    /// Start cell of `id`.
    pub fn get(&self, id: &SectionId) -> Option<usize> {
        self.starts.get(id).copied()
    }

    #[must_use]
    /// Whether `id` is a key.
    pub fn contains(&self, id: &SectionId) -> bool {
        self.starts.contains_key(id)
    }

    #[must_use]
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[must_use]
    /// True if no sections are recorded.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    #[must_use]
    /// Sections and their start cells in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&SectionId, usize)> {
        self.starts.iter().map(|(id, cell)| (id, *cell))
    }

    #[must_use]
    /// Identifiers in document order.
    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.starts.keys()
    }
}

impl FromIterator<(SectionId, usize)> for SectionLocalizer {
    fn from_iter<T: IntoIterator<Item = (SectionId, usize)>>(iter: T) -> Self {
        Self {
            starts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SectionLocalizer {
    type Item = (&'a SectionId, &'a usize);
    type IntoIter = std::collections::btree_map::Iter<'a, SectionId, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.starts.iter()
    }
}
