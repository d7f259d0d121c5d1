//! Value mapping
//!
//! Replaces coded cells of a survey dataset with the labels of the
//! questionnaire's choice lists.

use super::choice::choice_label_map;
use crate::error::Result;
use crate::frame::text_values;
use crate::models::ChoiceLabels;
use crate::schema::best_fit_series;
use indexmap::IndexMap;
use polars::prelude::*;
use tracing::{debug, warn};

/// Relabel a dataset with the choice lists of a questionnaire definition
///
/// Returns a new frame; `dataset` is left as it was. See
/// [`apply_value_labels`] for the per-column rules.
pub fn map_value_labels(dataset: &DataFrame, definition: &DataFrame) -> Result<DataFrame> {
    let categories = choice_label_map(definition)?;
    apply_value_labels(dataset, &categories)
}

/// Relabel a dataset with an already resolved choice-label mapping
///
/// For every column named in `categories`, float columns holding only
/// integral values are first narrowed to integers. Each cell is then
/// compared as text against the codes: known codes are replaced by their
/// label, unknown codes keep their text and nulls stay null. Text cells are
/// compared as they are, so `"01"` only matches the code `"01"`. A column in
/// which no cell matched is returned as it was. Columns absent from
/// `categories` are not touched.
pub fn apply_value_labels(dataset: &DataFrame, categories: &ChoiceLabels) -> Result<DataFrame> {
    let mut labelled = dataset.clone();
    let mut mapped_columns = 0;

    for column in dataset.get_columns() {
        let Some(category) = categories.get(column.name().as_str()) else {
            continue;
        };

        let original = column.as_materialized_series();
        let coerced = best_fit_series(original)?;
        if let Some(relabelled) = relabel(&coerced, category)? {
            labelled.with_column(relabelled)?;
            mapped_columns += 1;
        }
    }

    debug!(
        "Mapped value labels in {} of {} columns",
        mapped_columns,
        dataset.width()
    );
    Ok(labelled)
}

/// Text column with known codes replaced, or `None` when nothing matched
fn relabel(series: &Series, category: &IndexMap<String, String>) -> Result<Option<Series>> {
    let cells = match text_values(series) {
        Ok(cells) => cells,
        Err(err) => {
            warn!(
                "Column '{}' of type {:?} cannot be compared with codes: {}",
                series.name(),
                series.dtype(),
                err
            );
            return Ok(None);
        }
    };

    let mut matched = 0usize;
    let values: Vec<Option<String>> = cells
        .into_iter()
        .map(|cell| {
            cell.map(|code| match category.get(&code) {
                Some(label) => {
                    matched += 1;
                    label.clone()
                }
                None => code,
            })
        })
        .collect();

    if matched == 0 {
        return Ok(None);
    }
    Ok(Some(Series::new(series.name().clone(), values)))
}
