//! Best-fit dtype coercion for survey datasets.
//!
//! Survey payloads often carry integral codes stored as floats. Before codes
//! are matched against a choice list such columns are narrowed to nullable
//! integers, so that `1.0` renders as the code `"1"`. Text is never parsed:
//! `"01"` and `"1.0"` stay exactly as they are.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Largest magnitude at which every integral `f64` is exactly representable
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Narrow a single column to its best-fit nullable type
///
/// Float columns whose values are all integral become `Int64`. Text,
/// integer, boolean and entirely null columns are returned as they are.
pub fn best_fit_series(series: &Series) -> Result<Series> {
    if series.is_empty() || series.null_count() == series.len() {
        return Ok(series.clone());
    }

    let fitted = match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            integral_floats(series)?.unwrap_or_else(|| series.clone())
        }
        _ => series.clone(),
    };

    if fitted.dtype() != series.dtype() {
        debug!(
            "Column '{}' coerced from {:?} to {:?}",
            series.name(),
            series.dtype(),
            fitted.dtype()
        );
    }
    Ok(fitted)
}

/// `Int64` rendition of a float column, if every value is integral
fn integral_floats(series: &Series) -> Result<Option<Series>> {
    let floats = series.cast(&DataType::Float64)?;
    let integral = floats
        .f64()?
        .into_iter()
        .flatten()
        .all(|v| v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_FLOAT_INT);

    if integral {
        Ok(Some(floats.cast(&DataType::Int64)?))
    } else {
        Ok(None)
    }
}
