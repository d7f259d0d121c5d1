//! Configuration management and validation.
//!
//! Provides the settings shared by the label resolvers, the numeric
//! coercion helper and the pagination layer, with defaults matching the
//! data bridges API conventions.

use crate::constants::{DEFAULT_JSON_INDENT, DEFAULT_PAGE_DELAY_MS, DEFAULT_SENTINEL};
use crate::error::{LabelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Global configuration for label resolution and data retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Fill value for missing or non-numeric entries in numeric coercion
    pub sentinel: i64,

    /// Indentation width of JSON renderings
    pub json_indent: usize,

    /// Items requested per page; the endpoint's default when unset
    pub page_size: Option<usize>,

    /// Pause between page requests
    pub page_delay_ms: u64,

    /// Location of the country reference table
    pub country_codes_path: Option<PathBuf>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            json_indent: DEFAULT_JSON_INDENT,
            page_size: None,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            country_codes_path: None,
        }
    }
}

impl LabelConfig {
    /// Load configuration from a JSON file, filling absent keys with defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: LabelConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check invariants the rest of the crate relies on
    pub fn validate(&self) -> Result<()> {
        if self.page_size == Some(0) {
            return Err(LabelError::configuration(
                "page_size must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Set the numeric coercion fill value
    pub fn with_sentinel(mut self, sentinel: i64) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Set the JSON indentation width
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.json_indent = indent;
        self
    }

    /// Set the number of items requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the pause between page requests
    pub fn with_page_delay_ms(mut self, delay_ms: u64) -> Self {
        self.page_delay_ms = delay_ms;
        self
    }

    /// Set the country reference table location
    pub fn with_country_codes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.country_codes_path = Some(path.into());
        self
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
