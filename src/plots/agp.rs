//! Ambulatory glucose profile: median and percentile envelopes by time of day.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::analysis::spline::resample_per_minute;
use crate::analysis::statistics::quantiles;
use crate::canvas::{Canvas, Figure, Spine, Tick};
use crate::error::Result;
use crate::series::GlucoseSeries;
use crate::style::{Color, FillStyle, LineStyle, AGP_BAND_COLOR};
use crate::table::Table;

pub const AGP_FIGURE_SIZE: [f32; 2] = [18.0, 5.0];

/// Quantiles computed per minute of day: 5th, 25th, median, 75th, 95th
pub const AGP_QUANTILES: [f64; 5] = [0.05, 0.25, 0.5, 0.75, 0.95];

pub const MINUTES_PER_DAY: u16 = 1440;
pub const TICK_STEP_MINUTES: u16 = 180;

/// Summary of every resampled value that fell on one minute of day
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgpBucket {
    pub minute: u16,
    pub count: usize,
    pub p5: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Per-minute resample of a (possibly multi-day) glucose series
#[derive(Clone, Debug)]
pub struct Agp {
    resampled: GlucoseSeries,
}

impl Agp {
    /// Resample to one value per minute; fails like the spline does
    pub fn new(series: &GlucoseSeries) -> Result<Self> {
        let resampled = resample_per_minute(series)?;
        Ok(Self { resampled })
    }

    pub fn from_table(table: &Table, date_col: &str, glucose_col: &str) -> Result<Self> {
        Self::new(&GlucoseSeries::from_table(table, date_col, glucose_col)?)
    }

    pub fn resampled(&self) -> &GlucoseSeries {
        &self.resampled
    }

    /// Group by minute of day across all days and summarise each group
    pub fn profile(&self) -> Vec<AgpBucket> {
        let mut groups: BTreeMap<u16, Vec<f64>> = BTreeMap::new();
        for reading in self.resampled.readings() {
            groups
                .entry(reading.minute_of_day())
                .or_default()
                .push(reading.value);
        }

        groups
            .into_iter()
            .map(|(minute, values)| {
                let q = quantiles(&values, &AGP_QUANTILES);
                AgpBucket {
                    minute,
                    count: values.len(),
                    p5: q[0],
                    p25: q[1],
                    median: q[2],
                    p75: q[3],
                    p95: q[4],
                }
            })
            .collect()
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        let profile = self.profile();
        let minutes: Vec<f64> = profile.iter().map(|b| b.minute as f64).collect();

        canvas.line(
            &minutes,
            &column(&profile, |b| b.median),
            LineStyle::new(Color::BLACK).width(3.0),
        );
        canvas.fill_between(
            &minutes,
            &column(&profile, |b| b.p25),
            &column(&profile, |b| b.p75),
            FillStyle::new(AGP_BAND_COLOR, 0.3),
        );
        canvas.fill_between(
            &minutes,
            &column(&profile, |b| b.p5),
            &column(&profile, |b| b.p95),
            FillStyle::new(AGP_BAND_COLOR, 0.1),
        );

        let mut ticks: Vec<Tick> = profile
            .iter()
            .filter(|b| b.minute % TICK_STEP_MINUTES == 0)
            .map(|b| Tick::new(b.minute as f64, clock_label(b.minute)))
            .collect();
        ticks.push(Tick::new(MINUTES_PER_DAY as f64, clock_label(MINUTES_PER_DAY)));
        canvas.set_xticks(ticks);

        canvas.hide_spine(Spine::Right);
        canvas.hide_spine(Spine::Top);
        canvas.set_ylabel("Glucose (mg/dL)", 14.0);

        debug!(buckets = profile.len(), "drew AGP");
    }

    pub fn render_new(&self) -> Figure {
        let mut figure = Figure::new(AGP_FIGURE_SIZE);
        self.render(&mut figure);
        figure
    }
}

fn column(profile: &[AgpBucket], f: impl Fn(&AgpBucket) -> f64) -> Vec<f64> {
    profile.iter().map(f).collect()
}

/// `"H:00"` for a minute-of-day tick
pub fn clock_label(minute: u16) -> String {
    format!("{}:00", minute / 60)
}
