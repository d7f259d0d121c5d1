//! DataFrame helpers shared by the resolvers and the API layer.
//!
//! Builds frames from JSON records, looks up required columns and nested
//! struct keys with schema errors that name the missing piece, and renders
//! cells as text for code matching.

use crate::error::{LabelError, Result};
use polars::prelude::*;
use serde_json::Value;
use std::io::Cursor;

/// Fetch a column the caller is required to supply
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| LabelError::missing_column(name))
}

/// Fetch a key of a struct-typed column
///
/// `column` is the name reported in the schema error when the key is absent.
pub fn struct_field(series: &Series, key: &str, column: &str) -> Result<Series> {
    series
        .struct_()?
        .field_by_name(key)
        .map_err(|_| LabelError::missing_key(key, column))
}

/// Whether a nested column carries no values at all
///
/// JSON inference types a column that is null in every row as `Null`
/// rather than as a struct or list.
pub fn is_all_null(series: &Series) -> bool {
    matches!(series.dtype(), DataType::Null) || series.null_count() == series.len()
}

/// Render every cell as text, keeping nulls as `None`
///
/// Integers render without a decimal point, so `1_i64` matches the code `"1"`.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let text = series.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Build a frame from an array of JSON objects, one row per object
///
/// Nested objects become struct columns and arrays become list columns.
/// Every record takes part in schema inference so that a key which is null
/// in the leading rows still gets its nested type.
pub fn frame_from_records(records: &[Value]) -> Result<DataFrame> {
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }

    let bytes = serde_json::to_vec(records)?;
    let df = JsonReader::new(Cursor::new(bytes))
        .with_json_format(JsonFormat::Json)
        .infer_schema_len(None)
        .finish()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_column_reports_name() {
        let df = df!("name" => ["q1"]).unwrap();

        assert!(require_column(&df, "name").is_ok());
        match require_column(&df, "label").unwrap_err() {
            LabelError::MissingColumn { column } => assert_eq!(column, "label"),
            other => panic!("Expected MissingColumn error, got {other:?}"),
        }
    }

    #[test]
    fn test_text_values_renders_integers_as_codes() {
        let series = Series::new("q".into(), [Some(1i64), None, Some(3)]);
        let values = text_values(&series).unwrap();

        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[test]
    fn test_frame_from_records_nested() {
        let records = vec![
            json!({"name": "q1", "choiceList": null}),
            json!({"name": "q2", "choiceList": {"choices": [{"name": "a", "label": "A"}]}}),
        ];
        let df = frame_from_records(&records).unwrap();

        assert_eq!(df.height(), 2);
        let choice_list = require_column(&df, "choiceList").unwrap();
        assert!(matches!(choice_list.dtype(), DataType::Struct(_)));
        let choices = struct_field(choice_list, "choices", "choiceList").unwrap();
        assert!(matches!(choices.dtype(), DataType::List(_)));
    }

    #[test]
    fn test_frame_from_records_empty() {
        let df = frame_from_records(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }
}
