//! Data Bridges Labels Library
//!
//! A Rust library for turning coded humanitarian survey data into
//! human-readable form using the questionnaire definitions served by the
//! data bridges API.
//!
//! This library provides tools for:
//! - Resolving column labels and per-field choice labels from a questionnaire definition
//! - Rendering label mappings as maps, indented JSON or tables
//! - Replacing coded dataset values with their labels
//! - Coercing columns to integers with a sentinel fill
//! - Resolving API response shapes and collecting paginated results
//! - Looking up VAM admin-0 codes for ISO3 country codes

pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod country;
pub mod definition;
pub mod error;
pub mod frame;
pub mod labels;
pub mod models;
pub mod schema;

// Re-export commonly used types
pub use api::{AccessType, ApiResponse, PageSource, StopRule, collect_pages, price_window_start};
pub use config::LabelConfig;
pub use country::{CountryCodes, CountryContext};
pub use definition::{
    choice_list_table, definition_frame, questionnaire_fields, read_definition_json,
};
pub use error::{LabelError, Result};
pub use labels::{
    LabelResolver, apply_value_labels, choice_label_map, clear_sentinel, coerce_numeric,
    coerce_numeric_with_sentinel, column_label_map, map_value_labels, resolve_choice_labels,
    resolve_column_labels,
};
pub use models::{
    Choice, ChoiceLabels, ChoiceList, ColumnLabels, FormField, LabelOutput, OutputFormat,
};
