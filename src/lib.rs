//! nbprune: remove numbered sections from notebooks and keep the numbering consistent.
//!
//! A notebook is a flat sequence of cells whose markdown headings carry dotted numbers
//! (`1.`, `1.2.`, `1.2.3.`). Removing a section deletes its heading cell and everything nested
//! beneath it, then renumbers the sections that followed it, both in the section map and in
//! the numbers printed in the headings themselves.
#![allow(clippy::multiple_crate_versions)]

pub mod cell;
pub mod config;
pub mod error;
pub mod formats;
pub mod input;
pub mod localizer;
pub mod remove;
pub mod section;
pub mod section_id;
pub mod transform;

pub use cell::{Cell, CellKind, NotebookCell};
pub use error::{BatchError, RemovalError, SectionIdError};
pub use localizer::SectionLocalizer;
pub use remove::{remove_section, remove_sections, Removal, RemovalReport, Remover};
pub use section_id::SectionId;
