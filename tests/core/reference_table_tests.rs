//! Tests for the bundled reference percentile table
//!
//! Tests cover:
//! - Loading the bundled file
//! - Percentile ordering within every row
//! - Selection errors

use glucoplot::error::PlotError;
use glucoplot::reference::{Gender, ReferenceTable};

use crate::common::REFERENCE_CSV;

fn bundled() -> ReferenceTable {
    ReferenceTable::load(REFERENCE_CSV).expect("bundled reference table should load")
}

#[test]
fn test_bundled_table_has_expected_columns() {
    let table = bundled();
    assert_eq!(table.percentiles(), &[3, 10, 25, 50, 75, 90, 97]);
    assert_eq!(table.variables(), vec!["BMI", "Glucose", "HbA1c"]);
}

#[test]
fn test_bundled_table_covers_every_gender() {
    let table = bundled();
    for variable in table.variables() {
        assert_eq!(
            table.genders_for(&variable),
            vec![Gender::Female, Gender::Male, Gender::All],
            "{} should have all genders",
            variable
        );
    }
}

#[test]
fn test_percentiles_increase_within_each_row() {
    let table = bundled();
    for row in table.rows() {
        let values: Vec<f64> = table
            .percentiles()
            .iter()
            .map(|&p| row.percentile(p).unwrap())
            .collect();
        assert!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "{} {} age {} is not monotone: {:?}",
            row.variable,
            row.gender,
            row.age,
            values
        );
    }
}

#[test]
fn test_select_orders_by_age() {
    let table = bundled();
    let rows = table.select("HbA1c", Gender::Male).unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows.windows(2).all(|w| w[0].age < w[1].age));
}

#[test]
fn test_select_unknown_variable() {
    let table = bundled();
    match table.select("Cholesterol", Gender::All) {
        Err(PlotError::ReferenceNotFound { variable, .. }) => assert_eq!(variable, "Cholesterol"),
        other => panic!("expected ReferenceNotFound, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = ReferenceTable::load("data/does_not_exist.csv");
    assert!(matches!(result, Err(PlotError::Io { .. })));
}
