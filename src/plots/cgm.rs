//! Glucose trace with meal annotations and sleep shading.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::analysis::spline::resample_per_minute;
use crate::canvas::{time_to_x, AxisKind, Canvas, Figure, Spine};
use crate::error::Result;
use crate::series::{GlucoseSeries, MealEvent, SleepInterval};
use crate::style::{
    Dash, FillStyle, HAlign, LineStyle, Marker, MarkerStyle, TextStyle, DIET_COLOR,
    GLUCOSE_COLOR, SLEEP_COLOR,
};
use crate::table::Table;

/// Default size of a trace figure in inches
pub const CGM_FIGURE_SIZE: [f32; 2] = [18.0, 5.0];

/// A rendered trace's y-range always covers at least this span (mg/dL)
pub const GLUCOSE_Y_FLOOR: f64 = 60.0;
pub const GLUCOSE_Y_CEILING: f64 = 150.0;

/// Meal marker sits this far below the clamped upper bound
const MEAL_MARKER_DROP: f64 = 2.0;
/// Label heights above the clamped upper bound, alternating per meal
const MEAL_LABEL_TIERS: [f64; 2] = [1.0, 5.0];
/// Labels are centred this many seconds before their meal
const MEAL_LABEL_LEAD_SECS: i64 = 450;

const SLEEP_ALPHA: f32 = 0.05;

/// Column names used by [`CgmPlot::from_tables`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CgmColumns {
    pub cgm_date: String,
    pub glucose: String,
    pub diet_date: String,
    pub diet_text: String,
}

impl Default for CgmColumns {
    fn default() -> Self {
        Self {
            cgm_date: "Date".to_string(),
            glucose: "glucose".to_string(),
            diet_date: "Date".to_string(),
            diet_text: "shortname_eng".to_string(),
        }
    }
}

/// A glucose trace plus optional meal and sleep overlays.
///
/// The plot holds only data. [`CgmPlot::render`] draws onto a canvas the
/// caller owns; every draw step is public so the steps can also be applied
/// individually.
#[derive(Clone, Debug, Default)]
pub struct CgmPlot {
    glucose: GlucoseSeries,
    meals: Option<Vec<MealEvent>>,
    sleep: Option<Vec<SleepInterval>>,
    smooth: bool,
}

impl CgmPlot {
    pub fn new(glucose: GlucoseSeries) -> Self {
        Self {
            glucose,
            ..Default::default()
        }
    }

    pub fn from_tables(cgm: &Table, diet: Option<&Table>, columns: &CgmColumns) -> Result<Self> {
        let glucose = GlucoseSeries::from_table(cgm, &columns.cgm_date, &columns.glucose)?;
        let meals = diet
            .map(|t| MealEvent::from_table(t, &columns.diet_date, &columns.diet_text))
            .transpose()?;
        Ok(Self {
            glucose,
            meals,
            ..Default::default()
        })
    }

    pub fn with_meals(mut self, meals: Vec<MealEvent>) -> Self {
        self.meals = Some(meals);
        self
    }

    pub fn with_sleep(mut self, sleep: Vec<SleepInterval>) -> Self {
        self.sleep = Some(sleep);
        self
    }

    /// Draw a spline-smoothed line instead of straight segments
    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn glucose(&self) -> &GlucoseSeries {
        &self.glucose
    }

    /// Run every draw step in order.
    ///
    /// The y-range always ends up covering at least 60..150, with or
    /// without meals.
    pub fn render<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        self.prep_axes(canvas);
        self.draw_glucose(canvas)?;
        clamp_glucose_range(canvas);
        if let Some(meals) = &self.meals {
            self.draw_meals(canvas, meals);
        }
        if let Some(sleep) = &self.sleep {
            self.draw_sleep(canvas, sleep);
        }
        Ok(())
    }

    /// Render onto a new [`CGM_FIGURE_SIZE`] figure
    pub fn render_new(&self) -> Result<Figure> {
        let mut figure = Figure::new(CGM_FIGURE_SIZE);
        self.render(&mut figure)?;
        Ok(figure)
    }

    /// Hide the top and right borders; x is a time axis
    pub fn prep_axes<C: Canvas>(&self, canvas: &mut C) {
        canvas.hide_spine(Spine::Right);
        canvas.hide_spine(Spine::Top);
        canvas.set_x_axis(AxisKind::DateTime);
    }

    /// Glucose line plus one marker per original sample.
    ///
    /// With smoothing the line follows a per-minute cubic-spline resample,
    /// which fails for fewer than four samples or non-increasing timestamps.
    pub fn draw_glucose<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        let xs: Vec<f64> = self.glucose.readings().iter().map(|r| time_to_x(r.time)).collect();
        let ys = self.glucose.values();

        if self.smooth {
            let smoothed = resample_per_minute(&self.glucose)?;
            let sx: Vec<f64> = smoothed.readings().iter().map(|r| time_to_x(r.time)).collect();
            canvas.line(
                &sx,
                &smoothed.values(),
                LineStyle::new(GLUCOSE_COLOR).width(4.0).alpha(0.8),
            );
        } else {
            canvas.line(&xs, &ys, LineStyle::new(GLUCOSE_COLOR).width(4.0).alpha(0.9));
        }

        canvas.scatter(
            &xs,
            &ys,
            MarkerStyle::new(GLUCOSE_COLOR)
                .size(60.0)
                .alpha(0.6)
                .label("Glucose"),
        );
        debug!(samples = xs.len(), smooth = self.smooth, "drew glucose trace");
        Ok(())
    }

    /// Meal guides, markers and labels above the trace.
    ///
    /// Widens the y-range to cover at least 60..150 first and pins it.
    pub fn draw_meals<C: Canvas>(&self, canvas: &mut C, meals: &[MealEvent]) {
        let upper = clamp_glucose_range(canvas);

        let lead = Duration::seconds(MEAL_LABEL_LEAD_SECS);
        let groups = group_meals(meals);
        for (i, (time, text)) in groups.iter().enumerate() {
            let x = time_to_x(*time);
            canvas.axvline(x, LineStyle::new(DIET_COLOR).alpha(0.5).dash(Dash::Dotted));
            canvas.scatter(
                &[x],
                &[upper - MEAL_MARKER_DROP],
                MarkerStyle::new(DIET_COLOR)
                    .size(100.0)
                    .shape(Marker::TriangleDown),
            );
            canvas.text(
                time_to_x(*time - lead),
                upper + MEAL_LABEL_TIERS[i % 2],
                text,
                TextStyle::new(DIET_COLOR)
                    .font_size(10.0)
                    .h_align(HAlign::Center),
            );
        }
        debug!(meals = groups.len(), upper, "drew meal annotations");
    }

    /// Shade each sleep window over the current y-range, which is pinned
    pub fn draw_sleep<C: Canvas>(&self, canvas: &mut C, sleep: &[SleepInterval]) {
        let (lo, hi) = canvas.ylim();
        canvas.set_ylim(lo, hi);
        for interval in sleep {
            canvas.fill_between(
                &[time_to_x(interval.start), time_to_x(interval.end)],
                &[lo, lo],
                &[hi, hi],
                FillStyle::new(SLEEP_COLOR, SLEEP_ALPHA),
            );
        }
        debug!(intervals = sleep.len(), "drew sleep windows");
    }
}

/// Widen the y-range to cover at least 60..150 and pin it; returns the upper limit
pub fn clamp_glucose_range<C: Canvas>(canvas: &mut C) -> f64 {
    let (lo, hi) = canvas.ylim();
    let upper = hi.max(GLUCOSE_Y_CEILING);
    canvas.set_ylim(lo.min(GLUCOSE_Y_FLOOR), upper);
    upper
}

/// Meal labels sharing a timestamp, newline-joined, ordered by time
pub fn group_meals(meals: &[MealEvent]) -> Vec<(NaiveDateTime, String)> {
    let mut groups: BTreeMap<NaiveDateTime, Vec<&str>> = BTreeMap::new();
    for meal in meals {
        groups.entry(meal.time).or_default().push(&meal.label);
    }
    groups
        .into_iter()
        .map(|(time, labels)| (time, labels.join("\n")))
        .collect()
}
