//! Error types for section identifiers, removals, heading scans and configuration.
//!
//! Every failure is fatal for the call that raised it: removals never apply partially, and the
//! orchestrator aborts the whole document rather than emit a half-renumbered one.

use crate::section_id::SectionId;
use std::fmt;
use std::ops::Range;

/// A string that does not read as a dotted section identifier such as `1.2.`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionIdError {
    /// Identifiers need a trailing `.` and at least one numeric segment.
    #[error("malformed section identifier {id:?}: expected digits separated by '.' with a trailing '.'")]
    MissingTrailingDot {
        /// The rejected input.
        id: String,
    },

    /// A dot-delimited component that is empty or not a non-negative integer.
    #[error("malformed section identifier {id:?}: segment {segment:?} is not a number")]
    InvalidSegment {
        /// The rejected input.
        id: String,
        /// The offending component.
        segment: String,
    },

    /// Incrementing the last segment would overflow.
    #[error("section identifier {id} has no successor")]
    SegmentOverflow {
        /// The identifier whose last segment is already at the maximum.
        id: String,
    },
}

/// Why a single section removal was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalError {
    /// The requested identifier is not a key of the localizer.
    #[error("unknown section {0}")]
    UnknownSection(SectionId),

    /// An identifier could not be parsed or stepped.
    #[error(transparent)]
    MalformedIdentifier(#[from] SectionIdError),

    /// The localizer cannot be read as a section tree consistent with the cells.
    #[error("unsupported topology at section {section}: {reason}")]
    UnsupportedTopology {
        /// The section whose position breaks the tree.
        section: SectionId,
        /// What is inconsistent.
        reason: TopologyIssue,
    },
}

/// The particular inconsistency behind [`RemovalError::UnsupportedTopology`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyIssue {
    /// The section starts at or beyond the end of the cell sequence.
    StartOutOfBounds {
        /// Recorded start cell.
        start: usize,
        /// Number of cells in the document.
        len: usize,
    },
    /// A nested section starts before the section containing it.
    ChildBeforeParent {
        /// The containing section.
        parent: SectionId,
    },
    /// The successor section does not start after the removed one.
    EmptyRange {
        /// Resolved range of the removed section.
        range: Range<usize>,
    },
    /// A section outside the removed subtree starts inside the removed range.
    ForeignSectionInRange {
        /// Resolved range of the removed section.
        range: Range<usize>,
    },
    /// A section inside the removed subtree starts outside the removed range.
    DescendantOutsideRange {
        /// Resolved range of the removed section.
        range: Range<usize>,
    },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartOutOfBounds { start, len } => {
                write!(f, "starts at cell {start} but the document has {len} cells")
            }
            Self::ChildBeforeParent { parent } => {
                write!(f, "starts before its enclosing section {parent}")
            }
            Self::EmptyRange { range } => {
                write!(f, "resolves to the empty cell range {range:?}")
            }
            Self::ForeignSectionInRange { range } => {
                write!(f, "is not nested in the removed section but starts inside cells {range:?}")
            }
            Self::DescendantOutsideRange { range } => {
                write!(f, "is nested in the removed section but starts outside cells {range:?}")
            }
        }
    }
}

/// A batch removal that stopped part way.
///
/// Removals that completed before the failure stay applied: `cells` and `localizer` are the
/// state after the last successful removal, and `committed` lists those removals in order.
#[derive(Debug)]
pub struct BatchError<C> {
    /// The identifier whose removal failed.
    pub failed: SectionId,
    /// Why it failed.
    pub source: RemovalError,
    /// Identifiers removed before the failure, in processing order.
    pub committed: Vec<SectionId>,
    /// Cells after the committed removals.
    pub cells: Vec<C>,
    /// Localizer after the committed removals.
    pub localizer: crate::localizer::SectionLocalizer,
}

impl<C> fmt::Display for BatchError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to remove section {} after {} committed removals: {}",
            self.failed,
            self.committed.len(),
            self.source
        )
    }
}

impl<C: fmt::Debug> std::error::Error for BatchError<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Heading scanner failures.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The tree-sitter grammar could not be loaded.
    #[error("incompatible tree-sitter language: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The heading query does not compile against the grammar.
    #[error("invalid heading query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    /// The parser produced no tree for a cell.
    #[error("failed to parse cell {cell}")]
    Parse {
        /// Index of the cell that could not be parsed.
        cell: usize,
    },

    /// A heading node spans invalid UTF-8.
    #[error("heading text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`crate::config::Config`].
    #[error("invalid configuration: {0}")]
    Toml(String),
}

/// A document transformation that was aborted.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Headings could not be scanned.
    #[error("{document}: {source}")]
    Scan {
        /// Document name.
        document: String,
        /// Underlying scanner failure.
        source: ScanError,
    },

    /// A configured identifier does not parse.
    #[error("{document}: {source}")]
    Config {
        /// Document name.
        document: String,
        /// Underlying parse failure.
        source: SectionIdError,
    },

    /// A configured section could not be removed.
    #[error("{document}: cannot remove section {section}: {source}")]
    Removal {
        /// Document name.
        document: String,
        /// The section whose removal failed.
        section: SectionId,
        /// Underlying removal failure.
        source: RemovalError,
    },
}
