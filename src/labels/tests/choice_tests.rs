//! Tests for choice-label resolution

use super::*;
use crate::definition::{definition_frame, read_definition_json};
use crate::error::LabelError;
use crate::labels::{choice_label_map, resolve_choice_labels};
use crate::models::{Choice, ChoiceList, FormField, LabelOutput, OutputFormat};

#[test]
fn test_every_choice_appears_under_its_field() {
    let categories = choice_label_map(&sample_definition()).unwrap();

    assert_eq!(categories.len(), 1);
    let q2 = &categories["q2"];
    assert_eq!(q2.len(), 2);
    assert_eq!(q2["a"], "Option A");
    assert_eq!(q2["b"], "Option B");
}

#[test]
fn test_fields_without_choice_list_are_absent() {
    let categories = choice_label_map(&sample_definition()).unwrap();
    assert!(!categories.contains_key("q1"));
}

#[test]
fn test_repeated_field_merges_codes() {
    let categories = choice_label_map(&household_definition()).unwrap();
    let admin1 = &categories["ADMIN1Name"];

    // Union of both rows, later label wins for the shared code
    assert_eq!(admin1.len(), 3);
    assert_eq!(admin1["11"], "Amman");
    assert_eq!(admin1["21"], "Irbid Governorate");
    assert_eq!(admin1["22"], "Mafraq");
}

#[test]
fn test_disjoint_codes_union() {
    let df = definition_frame(&[
        FormField::new("q", "Q").with_choices(ChoiceList::new(vec![Choice::new("1", "One")])),
        FormField::new("q", "Q").with_choices(ChoiceList::new(vec![Choice::new("2", "Two")])),
    ])
    .unwrap();
    let categories = choice_label_map(&df).unwrap();

    let codes: Vec<&str> = categories["q"].keys().map(String::as_str).collect();
    assert_eq!(codes, vec!["1", "2"]);
}

#[test]
fn test_duplicate_code_within_one_list_last_wins() {
    let df = definition_frame(&[FormField::new("q", "Q").with_choices(ChoiceList::new(vec![
        Choice::new("1", "First"),
        Choice::new("1", "Second"),
    ]))])
    .unwrap();

    assert_eq!(choice_label_map(&df).unwrap()["q"]["1"], "Second");
}

#[test]
fn test_no_choice_lists_gives_empty_mapping() {
    let df = definition_frame(&[FormField::new("q1", "Q1")]).unwrap();
    assert!(choice_label_map(&df).unwrap().is_empty());
}

#[test]
fn test_empty_definition_gives_empty_mapping() {
    let df = definition_frame(&[]).unwrap();
    assert!(choice_label_map(&df).unwrap().is_empty());
}

#[test]
fn test_missing_choice_list_column() {
    let df = name_label_frame(&["q1"], &["Q1"]);

    let err = choice_label_map(&df).unwrap_err();
    assert!(err.is_schema_error());
    assert!(matches!(err, LabelError::MissingColumn { column } if column == "choiceList"));
}

#[test]
fn test_missing_choice_code_key() {
    let df = read_definition_json(
        br#"[{"name": "q1", "label": "Q1", "choiceList": {"choices": [{"label": "One"}]}}]"#,
    )
    .unwrap();

    assert!(matches!(
        choice_label_map(&df).unwrap_err(),
        LabelError::MissingKey { key, .. } if key == "name"
    ));
}

#[test]
fn test_return_as_json() {
    let output = resolve_choice_labels(&sample_definition(), OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(output.as_json().unwrap()).unwrap();

    assert_eq!(
        parsed,
        serde_json::json!({"q2": {"a": "Option A", "b": "Option B"}})
    );
}

#[test]
fn test_return_as_df() {
    let output = resolve_choice_labels(&household_definition(), OutputFormat::Df).unwrap();
    let LabelOutput::Frame(df) = output else {
        panic!("Expected a frame");
    };

    let columns: Vec<&str> = df.get_columns().iter().map(|c| c.name().as_str()).collect();
    assert_eq!(columns, vec!["name", "choiceLabels"]);
    assert_eq!(
        column_text(&df, "name"),
        texts(&[Some("RESPSex"), Some("ADMIN1Name")])
    );
    assert!(matches!(
        df.column("choiceLabels").unwrap().dtype(),
        DataType::List(_)
    ));
}

#[test]
fn test_return_empty_df() {
    let df = definition_frame(&[FormField::new("q1", "Q1")]).unwrap();
    let frame = resolve_choice_labels(&df, OutputFormat::Df)
        .unwrap()
        .into_frame()
        .unwrap();

    assert_eq!(frame.height(), 0);
    assert_eq!(frame.width(), 2);
}
