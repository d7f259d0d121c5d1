//! Choice-label resolution
//!
//! Builds the `name -> (code -> label)` mapping from the choice lists
//! embedded in a questionnaire definition.

use super::to_indented_json;
use crate::constants::{DEFAULT_JSON_INDENT, output_columns};
use crate::definition::choice_entries;
use crate::error::Result;
use crate::frame::frame_from_records;
use crate::models::{ChoiceLabels, LabelOutput, OutputFormat};
use polars::prelude::*;
use serde_json::{Map, Value};
use tracing::debug;

/// Resolve the choice-label mapping of a questionnaire definition
///
/// Fields without a choice list are absent from the result. When a field
/// name repeats, the later row's codes are merged into the existing inner
/// mapping: repeated codes take the later label, all other codes survive.
pub fn choice_label_map(definition: &DataFrame) -> Result<ChoiceLabels> {
    let mut categories = ChoiceLabels::new();
    for entry in choice_entries(definition)? {
        categories
            .entry(entry.field)
            .or_default()
            .insert(entry.code, entry.label);
    }

    debug!("Resolved choice labels for {} fields", categories.len());
    Ok(categories)
}

/// Resolve choice labels and render them in the requested format
pub fn resolve_choice_labels(
    definition: &DataFrame,
    format: OutputFormat,
) -> Result<LabelOutput<ChoiceLabels>> {
    render_choice_labels(choice_label_map(definition)?, format, DEFAULT_JSON_INDENT)
}

/// Render a choice-label mapping as a map, JSON text or a `name`/`choiceLabels` table
///
/// In the table each `choiceLabels` cell is a list of `{code, label}` structs.
pub fn render_choice_labels(
    categories: ChoiceLabels,
    format: OutputFormat,
    json_indent: usize,
) -> Result<LabelOutput<ChoiceLabels>> {
    match format {
        OutputFormat::Dict => Ok(LabelOutput::Map(categories)),
        OutputFormat::Json => Ok(LabelOutput::Json(to_indented_json(&categories, json_indent)?)),
        OutputFormat::Df => Ok(LabelOutput::Frame(choice_label_frame(&categories)?)),
    }
}

fn choice_label_frame(categories: &ChoiceLabels) -> Result<DataFrame> {
    if categories.is_empty() {
        let entry_type = DataType::Struct(vec![
            Field::new(output_columns::CODE.into(), DataType::String),
            Field::new(output_columns::LABEL.into(), DataType::String),
        ]);
        let df = DataFrame::new(vec![
            Series::new_empty(output_columns::NAME.into(), &DataType::String).into_column(),
            Series::new_empty(
                output_columns::CHOICE_LABELS.into(),
                &DataType::List(Box::new(entry_type)),
            )
            .into_column(),
        ])?;
        return Ok(df);
    }

    let records: Vec<Value> = categories
        .iter()
        .map(|(name, codes)| {
            let entries: Vec<Value> = codes
                .iter()
                .map(|(code, label)| {
                    let mut entry = Map::new();
                    entry.insert(output_columns::CODE.to_string(), Value::from(code.as_str()));
                    entry.insert(output_columns::LABEL.to_string(), Value::from(label.as_str()));
                    Value::Object(entry)
                })
                .collect();

            let mut record = Map::new();
            record.insert(output_columns::NAME.to_string(), Value::from(name.as_str()));
            record.insert(output_columns::CHOICE_LABELS.to_string(), Value::Array(entries));
            Value::Object(record)
        })
        .collect();

    let df = frame_from_records(&records)?;
    Ok(df.select([output_columns::NAME, output_columns::CHOICE_LABELS])?)
}
