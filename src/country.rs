//! Country reference table: ISO3 alpha codes to VAM admin-0 codes.
//!
//! The table is read from a JSON array of country objects at most once per
//! [`CountryContext`], on the first lookup. Nothing is cached globally, so
//! tests and callers can point independent contexts at different files.

use crate::constants::country_keys;
use crate::error::{LabelError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// ISO3 -> ADM0 mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodes {
    codes: HashMap<String, i64>,
}

impl CountryCodes {
    /// Parse the reference table
    ///
    /// Entries where either `iso3Alpha3` or `adm0Code` is missing or null are
    /// dropped.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let countries = value.as_array().ok_or_else(|| LabelError::InvalidResponse {
            reason: "country list must be a JSON array".to_string(),
        })?;

        let codes: HashMap<String, i64> = countries
            .iter()
            .filter_map(|country| {
                let iso3 = country.get(country_keys::ISO3)?.as_str()?;
                let adm0 = country.get(country_keys::ADM0)?.as_i64()?;
                Some((iso3.to_string(), adm0))
            })
            .collect();

        debug!(
            "Parsed {} of {} country entries",
            codes.len(),
            countries.len()
        );
        Ok(Self { codes })
    }

    /// Read the reference table from disk
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| LabelError::CountryCodes {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&bytes).map_err(|e| LabelError::CountryCodes {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// ADM0 code for an exact ISO3 key
    pub fn get(&self, iso3: &str) -> Option<i64> {
        self.codes.get(iso3).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Owner of a lazily loaded [`CountryCodes`] table
#[derive(Debug)]
pub struct CountryContext {
    path: PathBuf,
    codes: OnceLock<CountryCodes>,
}

impl CountryContext {
    /// Create a context; the file is not read until the first lookup
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codes: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The reference table, loading it on first use
    ///
    /// A failed load is not cached; the next call tries the file again.
    pub fn codes(&self) -> Result<&CountryCodes> {
        if let Some(codes) = self.codes.get() {
            return Ok(codes);
        }
        let loaded = CountryCodes::load(&self.path)?;
        debug!("Loaded country codes from {}", self.path.display());
        Ok(self.codes.get_or_init(|| loaded))
    }

    /// ADM0 code for an ISO3 code, case-insensitively
    ///
    /// Returns `Ok(None)` for codes the table does not know.
    pub fn adm0_code(&self, iso3: &str) -> Result<Option<i64>> {
        Ok(self.codes()?.get(&iso3.to_uppercase()))
    }
}
