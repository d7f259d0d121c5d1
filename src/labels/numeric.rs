//! Numeric coercion with a sentinel fill.

use crate::constants::DEFAULT_SENTINEL;
use crate::error::{LabelError, Result};
use crate::frame::require_column;
use polars::prelude::*;
use tracing::{debug, warn};

/// Coerce columns to `Int64`, filling non-numeric and missing cells with 9999
pub fn coerce_numeric<S: AsRef<str>>(dataset: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    coerce_numeric_with_sentinel(dataset, columns, DEFAULT_SENTINEL)
}

/// Coerce columns to `Int64`, filling non-numeric and missing cells with `sentinel`
///
/// Values are parsed as numbers and truncated towards zero. A column that
/// cannot be converted at all (nested types, values outside the `i64`
/// range) is left unchanged and the remaining columns are still processed.
/// Naming a column the dataset does not have is a schema error.
pub fn coerce_numeric_with_sentinel<S: AsRef<str>>(
    dataset: &DataFrame,
    columns: &[S],
    sentinel: i64,
) -> Result<DataFrame> {
    let mut coerced = dataset.clone();

    for name in columns {
        let name = name.as_ref();
        let series = require_column(dataset, name)?;

        match integers_with_sentinel(series, sentinel) {
            Ok(converted) => {
                coerced.with_column(converted)?;
                debug!("Column '{}' coerced to Int64", name);
            }
            Err(err) => warn!("Skipping numeric coercion of column '{}': {}", name, err),
        }
    }

    Ok(coerced)
}

fn integers_with_sentinel(series: &Series, sentinel: i64) -> Result<Series> {
    let name = series.name().clone();

    if series.dtype().is_integer() {
        let integers = series.cast(&DataType::Int64)?;
        let values: Vec<i64> = integers
            .i64()?
            .into_iter()
            .map(|v| v.unwrap_or(sentinel))
            .collect();
        return Ok(Series::new(name, values));
    }

    let numbers = series.cast(&DataType::Float64)?;
    let mut values = Vec::with_capacity(numbers.len());
    for value in numbers.f64()?.into_iter() {
        let integer = match value {
            None => sentinel,
            Some(v) if v.is_nan() => sentinel,
            Some(v) if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                v.trunc() as i64
            }
            Some(v) => {
                return Err(LabelError::NumericCoercion {
                    column: name.to_string(),
                    reason: format!("{v} is outside the Int64 range"),
                });
            }
        };
        values.push(integer);
    }

    Ok(Series::new(name, values))
}

/// Turn sentinel values of integer columns back into nulls
pub fn clear_sentinel(dataset: &DataFrame, sentinel: i64) -> Result<DataFrame> {
    let mut cleared = dataset.clone();

    for column in dataset.get_columns() {
        if !column.dtype().is_integer() {
            continue;
        }
        let series = column.as_materialized_series().cast(&DataType::Int64)?;
        let values: Vec<Option<i64>> = series
            .i64()?
            .into_iter()
            .map(|v| v.filter(|&value| value != sentinel))
            .collect();
        cleared.with_column(Series::new(series.name().clone(), values))?;
    }

    Ok(cleared)
}
