//! Column-label resolution
//!
//! Builds the `name -> label` dictionary used to title dataset columns.

use super::to_indented_json;
use crate::constants::{DEFAULT_JSON_INDENT, LABEL_COLUMN, NAME_COLUMN, output_columns};
use crate::error::Result;
use crate::frame::{require_column, text_values};
use crate::models::{ColumnLabels, LabelOutput, OutputFormat};
use polars::prelude::*;
use tracing::debug;

/// Resolve the column-label mapping of a questionnaire definition
///
/// Rows are processed top to bottom. A name seen for the first time maps
/// to its label, or to itself when the label is empty. A non-empty name
/// seen again is overwritten with the later row's label even when that
/// label is empty: the fallback to the name applies only on first sight.
/// Null names and labels are read as empty strings, so a null label falls
/// back to the name; it is deliberately never rendered as the text `nan`.
pub fn column_label_map(definition: &DataFrame) -> Result<ColumnLabels> {
    let names = text_values(require_column(definition, NAME_COLUMN)?)?;
    let labels = text_values(require_column(definition, LABEL_COLUMN)?)?;

    let mut mapping = ColumnLabels::with_capacity(names.len());
    for (name, label) in names.into_iter().zip(labels) {
        let name = name.unwrap_or_default();
        let label = label.unwrap_or_default();

        if mapping.contains_key(&name) && !name.is_empty() {
            mapping.insert(name, label);
        } else if label.is_empty() {
            mapping.insert(name.clone(), name);
        } else {
            mapping.insert(name, label);
        }
    }

    debug!("Resolved {} column labels", mapping.len());
    Ok(mapping)
}

/// Resolve column labels and render them in the requested format
pub fn resolve_column_labels(
    definition: &DataFrame,
    format: OutputFormat,
) -> Result<LabelOutput<ColumnLabels>> {
    render_column_labels(column_label_map(definition)?, format, DEFAULT_JSON_INDENT)
}

/// Render a column-label mapping as a map, JSON text or a `colName`/`label` table
pub fn render_column_labels(
    mapping: ColumnLabels,
    format: OutputFormat,
    json_indent: usize,
) -> Result<LabelOutput<ColumnLabels>> {
    match format {
        OutputFormat::Dict => Ok(LabelOutput::Map(mapping)),
        OutputFormat::Json => Ok(LabelOutput::Json(to_indented_json(&mapping, json_indent)?)),
        OutputFormat::Df => {
            let (names, labels): (Vec<String>, Vec<String>) = mapping.into_iter().unzip();
            let df = DataFrame::new(vec![
                Column::new(output_columns::COL_NAME.into(), names),
                Column::new(output_columns::LABEL.into(), labels),
            ])?;
            Ok(LabelOutput::Frame(df))
        }
    }
}
