//! Configuration of which sections to remove from which documents.
//!
//! Specifically, we try to find an nbprune.toml, and if present we load settings from there.
//! This provides the per-document removal lists and whether cell text is renumbered too.

use crate::error::{ConfigError, SectionIdError};
use crate::section_id::SectionId;
use facet::Facet;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "nbprune.toml";

#[derive(Facet, Clone, Debug)]
/// Removal settings loaded from nbprune.toml or falling back to defaults.
///
/// ```toml
/// patch_text = true
///
/// [documents]
/// "CARE_2D.ipynb" = ["1.1.", "1.2.", "2.", "6.3."]
/// ```
pub struct Config {
    #[facet(default)]
    /// Section identifiers to remove, keyed by document name.
    pub documents: HashMap<String, Vec<String>>,
    #[facet(default = true)]
    /// Rewrite the numbers printed in renumbered headings.
    pub patch_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents: HashMap::new(),
            patch_text: true,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from nbprune.toml if present and valid, otherwise use defaults.
    pub fn load() -> Self {
        match Self::from_path(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Parsed identifiers to remove from `document`; empty if the document is not listed.
    ///
    /// # Errors
    ///
    /// Returns an error for the first listed identifier that does not parse.
    pub fn removals_for(&self, document: &str) -> Result<Vec<SectionId>, SectionIdError> {
        self.documents
            .get(document)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|id| SectionId::parse(id))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
