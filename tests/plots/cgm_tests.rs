//! Tests for the glucose trace plot
//!
//! Tests cover:
//! - Trace and marker counts
//! - Meal annotations and the y-range they force
//! - Sleep shading
//! - Smoothed traces through the original samples

use glucoplot::canvas::{time_to_x, Artist, AxisKind, Canvas, Figure, Spine};
use glucoplot::error::PlotError;
use glucoplot::plots::{CgmColumns, CgmPlot};
use glucoplot::series::SleepInterval;

use crate::common::{at, cgm_table, diet_table, five_point_series, meals, series};

// ============================================
// Trace Tests
// ============================================

#[test]
fn test_five_points_give_one_line_and_five_markers() {
    let fig = CgmPlot::new(five_point_series()).render_new().unwrap();

    assert_eq!(fig.lines().count(), 1);
    let (markers, style) = fig.scatters().next().unwrap();
    assert_eq!(markers.len(), 5);
    assert_eq!(style.label.as_deref(), Some("Glucose"));
    assert_eq!(markers[2], [time_to_x(at(8, 30)), 142.0]);
}

#[test]
fn test_axes_are_time_based_without_top_and_right_spines() {
    let fig = CgmPlot::new(five_point_series()).render_new().unwrap();
    assert_eq!(fig.x_axis(), AxisKind::DateTime);
    assert!(!fig.spine_visible(Spine::Top));
    assert!(!fig.spine_visible(Spine::Right));
    assert!(fig.spine_visible(Spine::Bottom));
}

#[test]
fn test_smoothed_trace_passes_through_samples() {
    let original = five_point_series();
    let fig = CgmPlot::new(original.clone())
        .smooth(true)
        .render_new()
        .unwrap();

    let (line, _) = fig.lines().next().unwrap();
    // 08:00..09:00 at one-minute resolution
    assert_eq!(line.len(), 61);
    for reading in original.readings() {
        let x = time_to_x(reading.time);
        let point = line.iter().find(|p| p[0] == x).unwrap();
        assert!(
            (point[1] - reading.value).abs() < 1e-9,
            "smoothed {} vs sample {}",
            point[1],
            reading.value
        );
    }
}

#[test]
fn test_smoothing_needs_four_samples() {
    let short = series(&[(at(8, 0), 90.0), (at(8, 5), 95.0), (at(8, 10), 99.0)]);
    let err = CgmPlot::new(short).smooth(true).render_new().unwrap_err();
    assert!(matches!(err, PlotError::InsufficientData { needed: 4, got: 3 }));
}

#[test]
fn test_unsmoothed_short_series_is_fine() {
    let short = series(&[(at(8, 0), 90.0), (at(8, 5), 95.0)]);
    let fig = CgmPlot::new(short).render_new().unwrap();
    assert_eq!(fig.lines().count(), 1);
}

// ============================================
// Meal Tests
// ============================================

#[test]
fn test_meals_widen_y_range() {
    let fig = CgmPlot::new(five_point_series())
        .with_meals(meals())
        .render_new()
        .unwrap();

    let (lo, hi) = fig.ylim();
    assert!(lo <= 60.0);
    assert!(hi >= 150.0);
}

#[test]
fn test_low_trace_still_reaches_ceiling() {
    let flat = series(&[
        (at(8, 0), 72.0),
        (at(8, 15), 80.0),
        (at(8, 30), 76.0),
    ]);
    let fig = CgmPlot::new(flat).with_meals(meals()).render_new().unwrap();
    assert_eq!(fig.ylim(), (60.0, 150.0));
}

#[test]
fn test_high_trace_keeps_its_range() {
    let high = series(&[(at(8, 0), 180.0), (at(8, 30), 240.0)]);
    let mut fig = Figure::default();
    let plot = CgmPlot::new(high).with_meals(meals());
    plot.render(&mut fig).unwrap();
    let (_, hi) = fig.ylim();
    assert!(hi > 240.0);
}

#[test]
fn test_meals_at_same_time_share_one_annotation() {
    let fig = CgmPlot::new(five_point_series())
        .with_meals(meals())
        .render_new()
        .unwrap();

    let guides = fig
        .artists()
        .iter()
        .filter(|a| matches!(a, Artist::VLine { .. }))
        .count();
    assert_eq!(guides, 2);

    let labels: Vec<&str> = fig.texts().map(|(_, _, t)| t).collect();
    assert_eq!(labels, vec!["oatmeal\ncoffee", "apple"]);
}

#[test]
fn test_meal_markers_sit_below_upper_limit() {
    let fig = CgmPlot::new(five_point_series())
        .with_meals(meals())
        .render_new()
        .unwrap();
    let (_, hi) = fig.ylim();
    let meal_markers: Vec<[f64; 2]> = fig
        .scatters()
        .skip(1)
        .flat_map(|(points, _)| points.iter().copied())
        .collect();
    assert_eq!(meal_markers.len(), 2);
    assert!(meal_markers.iter().all(|p| (p[1] - (hi - 2.0)).abs() < 1e-9));
}

#[test]
fn test_from_tables_reads_default_columns() {
    let cgm = cgm_table(&five_point_series());
    let diet = diet_table(&meals());
    let plot = CgmPlot::from_tables(&cgm, Some(&diet), &CgmColumns::default()).unwrap();
    assert_eq!(plot.glucose().len(), 5);

    let fig = plot.render_new().unwrap();
    assert_eq!(fig.texts().count(), 2);
}

#[test]
fn test_from_tables_missing_column() {
    let cgm = cgm_table(&five_point_series());
    let columns = CgmColumns {
        glucose: "sgv".to_string(),
        ..Default::default()
    };
    let err = CgmPlot::from_tables(&cgm, None, &columns).unwrap_err();
    assert!(matches!(err, PlotError::MissingColumn(name) if name == "sgv"));
}

// ============================================
// Sleep Tests
// ============================================

#[test]
fn test_sleep_span_is_exact() {
    let fig = CgmPlot::new(five_point_series())
        .with_sleep(vec![SleepInterval::new(at(8, 10), at(8, 40))])
        .render_new()
        .unwrap();

    let fills: Vec<&Artist> = fig.fills().collect();
    assert_eq!(fills.len(), 1);
    let Artist::Fill {
        xs, lower, upper, ..
    } = fills[0]
    else {
        unreachable!()
    };
    assert_eq!(xs, &vec![time_to_x(at(8, 10)), time_to_x(at(8, 40))]);
    let (lo, hi) = fig.ylim();
    assert_eq!(lower, &vec![lo, lo]);
    assert_eq!(upper, &vec![hi, hi]);
}

#[test]
fn test_sleep_does_not_change_y_range() {
    let plot = CgmPlot::new(five_point_series());
    let mut fig = Figure::default();
    plot.render(&mut fig).unwrap();
    let before = fig.ylim();
    plot.draw_sleep(&mut fig, &[SleepInterval::new(at(8, 0), at(9, 0))]);
    assert_eq!(fig.ylim(), before);
}

#[test]
fn test_five_minute_example_covers_glucose_range() {
    let trace = series(&[
        (at(10, 0), 100.0),
        (at(10, 5), 110.0),
        (at(10, 10), 90.0),
        (at(10, 15), 120.0),
        (at(10, 20), 105.0),
    ]);
    let fig = CgmPlot::new(trace).render_new().unwrap();
    assert_eq!(fig.lines().count(), 1);
    assert_eq!(fig.scatters().map(|(p, _)| p.len()).sum::<usize>(), 5);
    assert!(fig.fills().next().is_none());
    assert!(fig.texts().next().is_none());

    let (lo, hi) = fig.ylim();
    assert!(lo <= 60.0 && hi >= 150.0, "ylim was ({}, {})", lo, hi);
}

#[test]
fn test_meal_draw_alone_clamps_low_range() {
    let plot = CgmPlot::new(series(&[(at(8, 0), 72.0), (at(8, 30), 80.0)]));
    let mut fig = Figure::default();
    plot.draw_glucose(&mut fig).unwrap();
    assert!(fig.ylim().1 < 150.0);

    plot.draw_meals(&mut fig, &meals());
    assert_eq!(fig.ylim(), (60.0, 150.0));
}

#[test]
fn test_half_hour_sleep_window() {
    let plot = CgmPlot::new(five_point_series());
    let mut fig = Figure::default();
    plot.draw_sleep(&mut fig, &[SleepInterval::new(at(10, 0), at(10, 30))]);
    let Some(Artist::Fill { xs, .. }) = fig.fills().next() else {
        panic!("no sleep fill drawn");
    };
    assert_eq!(xs[0], time_to_x(at(10, 0)));
    assert_eq!(xs[1], time_to_x(at(10, 30)));
}
