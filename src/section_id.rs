//! Dotted hierarchical section identifiers such as `1.`, `1.2.` and `1.2.3.`.
//!
//! An identifier is parsed once into its numeric segments. Ordering, ancestry and sibling
//! arithmetic all work on those segments, so `1.2.` and `12.` never look related and `1.10.`
//! sorts after `1.9.`. The string form is only produced for display and for patching the
//! numbers printed inside cell text.

use crate::error::SectionIdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Path of a section in the heading hierarchy.
///
/// The derived ordering compares segments numerically and lexicographically, which is document
/// order: a parent sorts before its children, and children sort before the parent's next sibling.
pub struct SectionId {
    segments: Vec<u32>,
}

impl SectionId {
    /// Parse `d1.d2. ... dn.`: non-negative integers, each followed by a `.`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailing `.` is missing or any segment is not a number.
    pub fn parse(id: &str) -> Result<Self, SectionIdError> {
        let Some(body) = id.strip_suffix('.') else {
            return Err(SectionIdError::MissingTrailingDot { id: id.to_string() });
        };

        let segments = body
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(SectionIdError::InvalidSegment {
                        id: id.to_string(),
                        segment: segment.to_string(),
                    });
                }
                segment.parse().map_err(|_| SectionIdError::InvalidSegment {
                    id: id.to_string(),
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        Ok(Self { segments })
    }

    /// Build an identifier from numeric segments; `None` for an empty path.
    #[must_use]
    pub fn from_segments(segments: Vec<u32>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    #[must_use]
    /// Numeric segments, outermost first.
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    #[must_use]
    /// Nesting depth (1 for top-level sections).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    /// Position among siblings.
    pub fn last_segment(&self) -> u32 {
        // Construction guarantees at least one segment.
        self.segments[self.segments.len() - 1]
    }

    #[must_use]
    /// The enclosing section's identifier, `None` at top level.
    pub fn parent(&self) -> Option<Self> {
        Self::from_segments(self.segments[..self.segments.len() - 1].to_vec())
    }

    /// The following section at the same depth: `1.2.` becomes `1.3.`.
    ///
    /// # Errors
    ///
    /// Returns an error if the last segment cannot be incremented.
    pub fn next_sibling(&self) -> Result<Self, SectionIdError> {
        let mut segments = self.segments.clone();
        let last = segments.len() - 1;
        segments[last] = segments[last]
            .checked_add(1)
            .ok_or_else(|| SectionIdError::SegmentOverflow { id: self.to_string() })?;
        Ok(Self { segments })
    }

    /// Successor candidates used to find where a section ends.
    ///
    /// Yields the next sibling, then the next sibling of each ancestor, innermost first:
    /// `1.2.3.` gives `1.2.4.`, `1.3.`, `2.`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the candidates overflows.
    pub fn successors(&self) -> Result<Vec<Self>, SectionIdError> {
        (1..=self.depth())
            .rev()
            .map(|depth| {
                Self {
                    segments: self.segments[..depth].to_vec(),
                }
                .next_sibling()
            })
            .collect()
    }

    #[must_use]
    /// True if `self` is `other` or encloses it.
    pub fn contains(&self, other: &Self) -> bool {
        other.segments.starts_with(&self.segments)
    }

    #[must_use]
    /// True if `self` strictly encloses `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.depth() < other.depth() && self.contains(other)
    }

    #[must_use]
    /// Segments shared by both identifiers from the root down.
    ///
    /// This is the common ancestor path; unlike [`longest_common_prefix`] it never stops in the
    /// middle of a number.
    pub fn common_ancestor(&self, other: &Self) -> Vec<u32> {
        self.segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect()
    }

    /// Replace the segment at zero-based `level` with `value`, keeping everything else.
    #[must_use]
    pub(crate) fn with_segment(&self, level: usize, value: u32) -> Self {
        let mut segments = self.segments.clone();
        segments[level] = value;
        Self { segments }
    }
}

impl FromStr for SectionId {
    type Err = SectionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SectionId {
    type Error = SectionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{segment}.")?;
        }
        Ok(())
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({self})")
    }
}

/// String-level successor: `"1.2."` becomes `"1.3."`.
///
/// # Errors
///
/// Returns an error if `id` is not a well-formed identifier.
pub fn next_sibling(id: &str) -> Result<String, SectionIdError> {
    Ok(SectionId::parse(id)?.next_sibling()?.to_string())
}

#[must_use]
/// Character-wise common prefix of two identifier strings.
///
/// The result may end in the middle of a segment (`"1.2."` and `"12."` share `"1"`); callers
/// that need the shared ancestor should use [`SectionId::common_ancestor`].
pub fn longest_common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}

#[cfg(test)]
#[path = "tests/section_id.rs"]
mod tests;
