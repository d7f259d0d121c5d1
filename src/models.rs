//! Core data structures and types for label resolution.
//!
//! Defines the label mapping types, the output format selector, and the
//! typed questionnaire rows used to build definition tables.

use crate::error::{LabelError, Result};
use indexmap::IndexMap;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field name -> display label, in first-seen order
pub type ColumnLabels = IndexMap<String, String>;

/// Field name -> (code -> label), in first-seen order
pub type ChoiceLabels = IndexMap<String, IndexMap<String, String>>;

/// Rendering requested from a label resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// In-memory mapping
    #[default]
    Dict,
    /// Mapping serialized as indented JSON text
    Json,
    /// Tabular projection
    Df,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Dict => "dict",
            OutputFormat::Json => "json",
            OutputFormat::Df => "df",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dict" => Ok(OutputFormat::Dict),
            "json" => Ok(OutputFormat::Json),
            "df" => Ok(OutputFormat::Df),
            other => Err(LabelError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved label mapping in the requested rendering
#[derive(Debug, Clone)]
pub enum LabelOutput<T> {
    Map(T),
    Json(String),
    Frame(DataFrame),
}

impl<T> LabelOutput<T> {
    pub fn format(&self) -> OutputFormat {
        match self {
            LabelOutput::Map(_) => OutputFormat::Dict,
            LabelOutput::Json(_) => OutputFormat::Json,
            LabelOutput::Frame(_) => OutputFormat::Df,
        }
    }

    pub fn into_map(self) -> Option<T> {
        match self {
            LabelOutput::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&str> {
        match self {
            LabelOutput::Json(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            LabelOutput::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

/// One questionnaire field as delivered by the form definition endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub choice_list: Option<ChoiceList>,
}

impl FormField {
    /// Free-text or numeric field with no categorical domain
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            choice_list: None,
        }
    }

    /// Attach a choice list to this field
    pub fn with_choices(mut self, choice_list: ChoiceList) -> Self {
        self.choice_list = Some(choice_list);
        self
    }
}

/// Enumerated domain of a categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub choices: Vec<Choice>,
}

impl ChoiceList {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self {
            name: None,
            choices,
        }
    }

    pub fn named(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            name: Some(name.into()),
            choices,
        }
    }
}

/// A single `{code, label}` pair of a choice list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// The coded value as stored in the dataset
    pub name: String,
    pub label: String,
}

impl Choice {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: code.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("dict".parse::<OutputFormat>().unwrap(), OutputFormat::Dict);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("df".parse::<OutputFormat>().unwrap(), OutputFormat::Df);
    }

    #[test]
    fn test_unknown_output_format_names_value() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        match &err {
            LabelError::UnknownFormat { format } => assert_eq!(format, "xml"),
            other => panic!("Expected UnknownFormat error, got {other:?}"),
        }
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_form_field_deserializes_camel_case() {
        let field: FormField = serde_json::from_str(
            r#"{"name": "q2", "label": "Q2",
                "choiceList": {"choices": [{"name": "a", "label": "Option A"}]}}"#,
        )
        .unwrap();

        assert_eq!(field.name, "q2");
        let list = field.choice_list.unwrap();
        assert_eq!(list.name, None);
        assert_eq!(list.choices, vec![Choice::new("a", "Option A")]);
    }

    #[test]
    fn test_form_field_defaults() {
        let field: FormField = serde_json::from_str(r#"{"name": "q1"}"#).unwrap();
        assert_eq!(field, FormField::new("q1", ""));
    }
}
