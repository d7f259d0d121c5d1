//! Error handling for label resolution and value mapping.
//!
//! Provides error types with context for malformed questionnaire
//! definitions, invalid output requests, and API payload failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing failed: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("Required column '{column}' not found in table")]
    MissingColumn { column: String },

    #[error("Required key '{key}' not found in column '{column}'")]
    MissingKey { key: String, column: String },

    #[error("Unknown output format '{format}' (expected one of: dict, json, df)")]
    UnknownFormat { format: String },

    #[error("Unknown access type '{access_type}' (expected one of: full, draft, official, public)")]
    UnknownAccessType { access_type: String },

    #[error("Column '{column}' cannot be coerced to integers: {reason}")]
    NumericCoercion { column: String, reason: String },

    #[error("Invalid API response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Country code table unavailable at {path}: {reason}")]
    CountryCodes { path: PathBuf, reason: String },
}

impl LabelError {
    /// Schema error for a column the caller was required to supply
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Schema error for a key missing inside a nested column
    pub fn missing_key(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the input table was malformed and must be fixed upstream
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumn { .. } | Self::MissingKey { .. })
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
