//! Label resolution and value mapping
//!
//! Turns a questionnaire definition into a column-label dictionary and a
//! per-field code/label mapping, and applies the latter to survey datasets.
//! All operations are pure: they read their input tables and return new
//! values without caching anything between calls.

pub mod choice;
pub mod column;
pub mod mapper;
pub mod numeric;

#[cfg(test)]
pub mod tests;

pub use choice::{choice_label_map, render_choice_labels, resolve_choice_labels};
pub use column::{column_label_map, render_column_labels, resolve_column_labels};
pub use mapper::{apply_value_labels, map_value_labels};
pub use numeric::{clear_sentinel, coerce_numeric, coerce_numeric_with_sentinel};

use crate::config::LabelConfig;
use crate::error::Result;
use crate::models::{ChoiceLabels, ColumnLabels, LabelOutput, OutputFormat};
use polars::prelude::DataFrame;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Label operations bound to a configuration
///
/// Carries the JSON indentation and numeric sentinel so that callers do
/// not have to thread them through every call.
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    config: LabelConfig,
}

impl LabelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the resolver
    pub fn with_config(mut self, config: LabelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn column_labels(
        &self,
        definition: &DataFrame,
        format: OutputFormat,
    ) -> Result<LabelOutput<ColumnLabels>> {
        render_column_labels(column_label_map(definition)?, format, self.config.json_indent)
    }

    pub fn choice_labels(
        &self,
        definition: &DataFrame,
        format: OutputFormat,
    ) -> Result<LabelOutput<ChoiceLabels>> {
        render_choice_labels(choice_label_map(definition)?, format, self.config.json_indent)
    }

    pub fn map_value_labels(
        &self,
        dataset: &DataFrame,
        definition: &DataFrame,
    ) -> Result<DataFrame> {
        map_value_labels(dataset, definition)
    }

    pub fn coerce_numeric<S: AsRef<str>>(
        &self,
        dataset: &DataFrame,
        columns: &[S],
    ) -> Result<DataFrame> {
        coerce_numeric_with_sentinel(dataset, columns, self.config.sentinel)
    }
}

/// Serialize with `indent` spaces per nesting level
pub(crate) fn to_indented_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
