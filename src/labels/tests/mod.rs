//! Shared test fixtures for label resolution tests

use crate::definition::definition_frame;
use crate::models::{Choice, ChoiceList, FormField};
use polars::prelude::*;

pub mod choice_tests;

/// Definition table with only `name` and `label` columns
pub fn name_label_frame(names: &[&str], labels: &[&str]) -> DataFrame {
    df!("name" => names, "label" => labels).unwrap()
}

/// Two-field questionnaire: a free-text `q1` and a categorical `q2`
pub fn sample_definition() -> DataFrame {
    definition_frame(&[
        FormField::new("q1", ""),
        FormField::new("q2", "Q2").with_choices(ChoiceList::new(vec![
            Choice::new("a", "Option A"),
            Choice::new("b", "Option B"),
        ])),
    ])
    .unwrap()
}

/// Household questionnaire with numeric codes and a repeated field
pub fn household_definition() -> DataFrame {
    definition_frame(&[
        FormField::new("RESPSex", "Sex of respondent").with_choices(ChoiceList::named(
            "sex",
            vec![Choice::new("0", "Female"), Choice::new("1", "Male")],
        )),
        FormField::new("HHSize", "Household size"),
        FormField::new("ADMIN1Name", "Governorate").with_choices(ChoiceList::named(
            "admin1",
            vec![Choice::new("11", "Amman"), Choice::new("21", "Irbid")],
        )),
        FormField::new("ADMIN1Name", "Governorate").with_choices(ChoiceList::named(
            "admin1_extra",
            vec![Choice::new("21", "Irbid Governorate"), Choice::new("22", "Mafraq")],
        )),
    ])
    .unwrap()
}

/// Text rendering of a column, for comparisons that ignore dtype
pub fn column_text(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    crate::frame::text_values(df.column(name).unwrap().as_materialized_series()).unwrap()
}

pub fn texts(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}
