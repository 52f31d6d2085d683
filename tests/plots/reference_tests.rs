//! Tests for the reference percentile overlay on the bundled table
//!
//! Tests cover:
//! - Curve, label and band counts
//! - Band nesting
//! - Gender colors

use glucoplot::canvas::{Artist, Canvas, Figure};
use glucoplot::error::PlotError;
use glucoplot::plots::reference::gender_color;
use glucoplot::plots::{age_reference_figure, plot_age_reference, DEFAULT_PERCENTILES};
use glucoplot::reference::{Gender, ReferenceTable};

use crate::common::REFERENCE_CSV;

fn table() -> ReferenceTable {
    ReferenceTable::load(REFERENCE_CSV).unwrap()
}

fn bands(fig: &Figure) -> Vec<(Vec<f64>, Vec<f64>)> {
    fig.fills()
        .filter_map(|a| match a {
            Artist::Fill { lower, upper, .. } => Some((lower.clone(), upper.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_default_percentiles_draw_five_curves() {
    let fig = age_reference_figure(&table(), "Glucose", Gender::All).unwrap();
    assert_eq!(fig.lines().count(), DEFAULT_PERCENTILES.len());
    assert_eq!(fig.texts().count(), DEFAULT_PERCENTILES.len());
    assert_eq!(bands(&fig).len(), 2);
}

#[test]
fn test_inner_band_lies_inside_outer_band() {
    for gender in [Gender::Female, Gender::Male, Gender::All] {
        let fig = age_reference_figure(&table(), "HbA1c", gender).unwrap();
        let bands = bands(&fig);
        let (outer_lo, outer_hi) = &bands[0];
        let (inner_lo, inner_hi) = &bands[1];
        for i in 0..outer_lo.len() {
            assert!(outer_lo[i] <= inner_lo[i]);
            assert!(inner_lo[i] <= inner_hi[i]);
            assert!(inner_hi[i] <= outer_hi[i]);
        }
    }
}

#[test]
fn test_curves_use_gender_color() {
    let fig = age_reference_figure(&table(), "BMI", Gender::Male).unwrap();
    assert!(fig
        .lines()
        .all(|(_, style)| style.color == gender_color(Gender::Male)));
    assert_ne!(gender_color(Gender::Male), gender_color(Gender::Female));
}

#[test]
fn test_labels_sit_right_of_last_age() {
    let fig = age_reference_figure(&table(), "BMI", Gender::Female).unwrap();
    assert!(fig.texts().all(|(x, _, _)| x == 70.5));
    let (lo, hi) = fig.xlim();
    assert_eq!((lo, hi), (40.0, 71.0));
    assert!(fig.texts().all(|(x, _, _)| x > lo && x < hi));
    let ticks: Vec<f64> = fig.resolved_x_ticks().iter().map(|t| t.value).collect();
    assert_eq!(ticks, vec![40.0, 50.0, 60.0, 70.0]);
}

#[test]
fn test_unknown_variable_is_reported() {
    let mut fig = Figure::default();
    let err = plot_age_reference(&table(), "LDL", Gender::All, &[50], &mut fig).unwrap_err();
    assert!(matches!(err, PlotError::ReferenceNotFound { .. }));
    assert!(fig.artists().is_empty());
}

#[test]
fn test_curves_ordered_by_percentile_at_every_age() {
    let table = table();
    for variable in table.variables() {
        for gender in table.genders_for(&variable) {
            let fig = age_reference_figure(&table, &variable, gender).unwrap();
            let curves: Vec<&[[f64; 2]]> = fig.lines().map(|(points, _)| points).collect();
            for pair in curves.windows(2) {
                for (a, b) in pair[0].iter().zip(pair[1]) {
                    assert_eq!(a[0], b[0]);
                    assert!(a[1] <= b[1], "{} {} at age {}", variable, gender, a[0]);
                }
            }
        }
    }
}
