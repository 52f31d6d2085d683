//! Tests for the ambulatory glucose profile
//!
//! Tests cover:
//! - Per-minute grouping across days
//! - Envelope ordering
//! - Tick layout

use glucoplot::canvas::{Artist, Canvas};
use glucoplot::plots::Agp;

use crate::common::{at, constant_days, day, series};

#[test]
fn test_constant_trace_has_exact_median() {
    let agp = Agp::new(&constant_days(2, 15, 117.0)).unwrap();
    let profile = agp.profile();

    assert_eq!(profile.len(), 1440);
    for bucket in &profile {
        assert_eq!(bucket.median, 117.0);
        assert_eq!(bucket.p5, 117.0);
        assert_eq!(bucket.p95, 117.0);
    }
}

#[test]
fn test_minutes_group_across_days() {
    let agp = Agp::new(&constant_days(2, 15, 100.0)).unwrap();
    let profile = agp.profile();
    // Midnight appears on day 0, 1 and 2; every other minute twice
    assert_eq!(profile[0].count, 3);
    assert_eq!(profile[1].count, 2);
    assert_eq!(profile[1439].minute, 1439);
}

#[test]
fn test_envelopes_are_ordered() {
    let trace = series(&[
        (day(0, 6, 0), 90.0),
        (day(0, 7, 0), 150.0),
        (day(0, 8, 0), 110.0),
        (day(0, 9, 0), 95.0),
        (day(1, 6, 0), 100.0),
        (day(1, 7, 0), 180.0),
        (day(1, 8, 0), 130.0),
        (day(1, 9, 0), 105.0),
    ]);
    let agp = Agp::new(&trace).unwrap();
    for b in agp.profile() {
        assert!(b.p5 <= b.p25 && b.p25 <= b.median);
        assert!(b.median <= b.p75 && b.p75 <= b.p95);
    }
}

#[test]
fn test_render_draws_median_then_bands() {
    let fig = Agp::new(&constant_days(1, 30, 100.0)).unwrap().render_new();

    let kinds: Vec<&str> = fig
        .artists()
        .iter()
        .map(|a| match a {
            Artist::Line { .. } => "line",
            Artist::Fill { .. } => "fill",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["line", "fill", "fill"]);

    let y_label = fig.y_label().unwrap();
    assert_eq!(y_label.text, "Glucose (mg/dL)");
    assert_eq!(y_label.font_size, 14.0);
}

#[test]
fn test_ticks_every_three_hours_with_day_end() {
    let fig = Agp::new(&constant_days(1, 30, 100.0)).unwrap().render_new();
    let labels: Vec<&str> = fig
        .x_ticks()
        .unwrap()
        .iter()
        .map(|t| t.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["0:00", "3:00", "6:00", "9:00", "12:00", "15:00", "18:00", "21:00", "24:00"]
    );
    assert!(fig.xlim().1 >= 1439.0);
}

#[test]
fn test_partial_day_only_ticks_present_minutes() {
    let trace = series(&[
        (at(8, 0), 90.0),
        (at(9, 0), 120.0),
        (at(10, 0), 110.0),
        (at(11, 0), 100.0),
    ]);
    let fig = Agp::new(&trace).unwrap().render_new();
    let values: Vec<f64> = fig.x_ticks().unwrap().iter().map(|t| t.value).collect();
    assert_eq!(values, vec![540.0, 1440.0]);
}

#[test]
fn test_too_few_samples() {
    let trace = series(&[(at(8, 0), 90.0), (at(9, 0), 120.0)]);
    assert!(Agp::new(&trace).is_err());
}
