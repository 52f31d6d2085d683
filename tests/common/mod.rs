//! Common test utilities shared across all test modules
//!
//! Builders for synthetic glucose traces, meal logs and tables so the
//! chart tests do not depend on data files beyond the bundled reference
//! table.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use glucoplot::series::{GlucoseReading, GlucoseSeries, MealEvent};
use glucoplot::table::{Column, Table};

/// Bundled reference percentile table
pub const REFERENCE_CSV: &str = "data/reference_percentiles.csv";

/// `2024-03-01 hh:mm:00`
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    day(0, h, m)
}

/// `hh:mm` on the `offset`-th day after 2024-03-01
pub fn day(offset: i64, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
        + Duration::days(offset)
}

/// Series from `(time, value)` pairs
pub fn series(points: &[(NaiveDateTime, f64)]) -> GlucoseSeries {
    GlucoseSeries::new(
        points
            .iter()
            .map(|&(time, value)| GlucoseReading::new(time, value))
            .collect(),
    )
}

/// Five readings 15 minutes apart starting at 08:00
pub fn five_point_series() -> GlucoseSeries {
    series(&[
        (at(8, 0), 95.0),
        (at(8, 15), 110.0),
        (at(8, 30), 142.0),
        (at(8, 45), 128.0),
        (at(9, 0), 104.0),
    ])
}

/// Constant readings every `step_minutes` covering `days` whole days
pub fn constant_days(days: i64, step_minutes: i64, value: f64) -> GlucoseSeries {
    let start = day(0, 0, 0);
    let count = days * 24 * 60 / step_minutes;
    GlucoseSeries::new(
        (0..=count)
            .map(|k| GlucoseReading::new(start + Duration::minutes(k * step_minutes), value))
            .collect(),
    )
}

pub fn meals() -> Vec<MealEvent> {
    vec![
        MealEvent::new(at(8, 5), "oatmeal"),
        MealEvent::new(at(8, 5), "coffee"),
        MealEvent::new(at(8, 40), "apple"),
    ]
}

/// Date/glucose table in the layout a CGM export has
pub fn cgm_table(series: &GlucoseSeries) -> Table {
    Table::new()
        .with_column("Date", Column::DateTime(series.times()))
        .unwrap()
        .with_column("glucose", Column::Number(series.values()))
        .unwrap()
}

pub fn diet_table(meals: &[MealEvent]) -> Table {
    Table::new()
        .with_column(
            "Date",
            Column::DateTime(meals.iter().map(|m| m.time).collect()),
        )
        .unwrap()
        .with_column(
            "shortname_eng",
            Column::Text(meals.iter().map(|m| m.label.clone()).collect()),
        )
        .unwrap()
}
