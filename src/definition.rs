//! Questionnaire definition tables.
//!
//! A definition table has one row per form field with the columns `name`,
//! `label` and `choiceList`, where `choiceList` is a nullable struct whose
//! `choices` key holds the ordered `{name, label}` pairs of the field's
//! categorical domain. This module builds such tables from the shapes the
//! form definition endpoint delivers and flattens their choice lists.

use crate::constants::{
    CHOICE_LIST_COLUMN, CHOICES_KEY, LABEL_COLUMN, NAME_COLUMN, choice_keys, output_columns,
};
use crate::error::{LabelError, Result};
use crate::frame::{frame_from_records, is_all_null, require_column, struct_field, text_values};
use crate::models::FormField;
use polars::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

/// One `{code, label}` pair of a field's choice list, in definition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Name of the field the choice list is attached to
    pub field: String,
    /// Name of the choice list itself, when the definition carries one
    pub list_name: Option<String>,
    pub code: String,
    pub label: String,
}

/// Definition table with the expected columns and no rows
pub fn empty_definition() -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new_empty(NAME_COLUMN.into(), &DataType::String).into_column(),
        Series::new_empty(LABEL_COLUMN.into(), &DataType::String).into_column(),
        Series::new_null(CHOICE_LIST_COLUMN.into(), 0).into_column(),
    ])?;
    Ok(df)
}

/// Build a definition table from raw field objects
///
/// Columns are taken as they appear in the records; a record set that
/// lacks `label` yields a table that the column-label resolver rejects.
pub fn definition_from_records(records: &[Value]) -> Result<DataFrame> {
    if records.is_empty() {
        return empty_definition();
    }
    let df = frame_from_records(records)?;
    debug!(
        "Loaded questionnaire definition: {} fields, columns {:?}",
        df.height(),
        df.get_column_names()
    );
    Ok(df)
}

/// Parse a JSON array of field objects into a definition table
pub fn read_definition_json(bytes: &[u8]) -> Result<DataFrame> {
    let value: Value = serde_json::from_slice(bytes)?;
    let records = value.as_array().ok_or_else(|| LabelError::InvalidResponse {
        reason: "questionnaire definition must be a JSON array of field objects".to_string(),
    })?;
    definition_from_records(records)
}

/// Build a definition table from typed fields
pub fn definition_frame(fields: &[FormField]) -> Result<DataFrame> {
    let records = fields
        .iter()
        .map(serde_json::to_value)
        .collect::<serde_json::Result<Vec<_>>>()?;
    definition_from_records(&records)
}

/// Extract the questionnaire of an XLSForm definition payload
///
/// The payload is either a single form object or an array of forms, in
/// which case the first form is used. The form's `fields` array becomes the
/// definition table.
pub fn questionnaire_fields(form_definition: &Value) -> Result<DataFrame> {
    let form = match form_definition {
        Value::Array(forms) => forms.first().ok_or_else(|| LabelError::InvalidResponse {
            reason: "form definition contains no forms".to_string(),
        })?,
        Value::Object(_) => form_definition,
        _ => {
            return Err(LabelError::InvalidResponse {
                reason: "form definition must be an object or an array of objects".to_string(),
            });
        }
    };

    let fields = form
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| LabelError::missing_key("fields", "form definition"))?;

    definition_from_records(fields)
}

/// Build a definition table from either payload shape
///
/// Accepts an XLSForm definition (a form object, or an array of forms
/// carrying `fields`) as well as a bare array of field objects.
pub fn definition_from_json(payload: &Value) -> Result<DataFrame> {
    match payload {
        Value::Object(_) => questionnaire_fields(payload),
        Value::Array(items) if items.first().is_some_and(|item| item.get("fields").is_some()) => {
            questionnaire_fields(payload)
        }
        Value::Array(records) => definition_from_records(records),
        _ => Err(LabelError::InvalidResponse {
            reason: "questionnaire definition must be a JSON object or array".to_string(),
        }),
    }
}

/// Flatten every non-null choice list into `{field, code, label}` entries
///
/// Rows whose `name`, `choiceList` or `choices` is null contribute nothing.
/// Choice entries without a code are skipped; a null label is read as the
/// empty string.
pub fn choice_entries(definition: &DataFrame) -> Result<Vec<ChoiceEntry>> {
    let names = require_column(definition, NAME_COLUMN)?;
    let choice_list = require_column(definition, CHOICE_LIST_COLUMN)?;

    if is_all_null(choice_list) {
        return Ok(Vec::new());
    }

    let choices = struct_field(choice_list, CHOICES_KEY, CHOICE_LIST_COLUMN)?;
    if is_all_null(&choices) {
        return Ok(Vec::new());
    }

    let list_names = match struct_field(choice_list, NAME_COLUMN, CHOICE_LIST_COLUMN) {
        Ok(series) => text_values(&series)?,
        Err(_) => vec![None; choice_list.len()],
    };
    let field_names = text_values(names)?;
    let present = choice_list.is_not_null();
    let nested_column = format!("{CHOICE_LIST_COLUMN}.{CHOICES_KEY}");

    let mut entries = Vec::new();
    for (row, row_choices) in choices.list()?.into_iter().enumerate() {
        if !present.get(row).unwrap_or(false) {
            continue;
        }
        let (Some(field), Some(row_choices)) = (&field_names[row], row_choices) else {
            continue;
        };
        if row_choices.is_empty() || is_all_null(&row_choices) {
            continue;
        }

        let codes = text_values(&struct_field(&row_choices, choice_keys::CODE, &nested_column)?)?;
        let labels = text_values(&struct_field(
            &row_choices,
            choice_keys::LABEL,
            &nested_column,
        )?)?;

        for (code, label) in codes.into_iter().zip(labels) {
            let Some(code) = code else {
                warn!("Skipping choice without a code in field '{}'", field);
                continue;
            };
            entries.push(ChoiceEntry {
                field: field.clone(),
                list_name: list_names[row].clone(),
                code,
                label: label.unwrap_or_default(),
            });
        }
    }

    debug!("Flattened {} choice entries", entries.len());
    Ok(entries)
}

/// Long-format table of every choice: `name` (choice list), `value`, `label`
///
/// Choice lists without a name of their own are reported under the name of
/// the field they are attached to.
pub fn choice_list_table(definition: &DataFrame) -> Result<DataFrame> {
    let entries = choice_entries(definition)?;

    let mut list_names = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    let mut labels = Vec::with_capacity(entries.len());
    for entry in entries {
        list_names.push(entry.list_name.unwrap_or(entry.field));
        values.push(entry.code);
        labels.push(entry.label);
    }

    let df = DataFrame::new(vec![
        Column::new(output_columns::NAME.into(), list_names),
        Column::new(output_columns::VALUE.into(), values),
        Column::new(output_columns::LABEL.into(), labels),
    ])?;
    Ok(df)
}
