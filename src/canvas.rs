//! Drawing-surface abstraction.
//!
//! Plotters never own their drawing target. They receive a `&mut impl Canvas`
//! and issue primitive draw calls against it. [`Figure`] is the in-memory
//! implementation: it records every primitive as an [`Artist`] and tracks
//! axis limits, ticks, labels and spine visibility so the result can be
//! inspected, exported ([`crate::export`]) or displayed ([`crate::viewer`]).

use chrono::{DateTime, NaiveDateTime};

use crate::style::{FillStyle, LineStyle, MarkerStyle, TextStyle};

/// Fraction of the data span added on each side of an autoscaled axis
pub const AXIS_MARGIN: f64 = 0.05;

/// Default figure size in inches
pub const DEFAULT_FIGURE_SIZE: [f32; 2] = [8.0, 5.0];

/// Convert a wall-clock timestamp into an x coordinate (seconds since the epoch)
pub fn time_to_x(time: NaiveDateTime) -> f64 {
    let utc = time.and_utc();
    utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 * 1e-9
}

/// Inverse of [`time_to_x`]; `None` when `x` is outside chrono's range
pub fn x_to_time(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    let secs = x.floor();
    let nanos = ((x - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos).map(|dt| dt.naive_utc())
}

// ============================================================================
// Canvas trait
// ============================================================================

/// One side of the axes frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spine {
    Top,
    Right,
    Bottom,
    Left,
}

/// How x values are interpreted when no explicit ticks are set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisKind {
    #[default]
    Linear,
    /// Seconds since the Unix epoch, see [`time_to_x`]
    DateTime,
}

/// A labelled tick mark
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// An axis label with its font size in points
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub font_size: f32,
}

/// A 2D plotting surface.
///
/// Every method is a mutation of the surface (or a read of its current
/// limits). Slices passed together must have equal lengths; extra elements
/// of the longer slice are ignored.
pub trait Canvas {
    /// Connected polyline through `(xs[i], ys[i])`
    fn line(&mut self, xs: &[f64], ys: &[f64], style: LineStyle);

    /// Discrete markers at `(xs[i], ys[i])`
    fn scatter(&mut self, xs: &[f64], ys: &[f64], style: MarkerStyle);

    /// Region between `lower` and `upper` over `xs`
    fn fill_between(&mut self, xs: &[f64], lower: &[f64], upper: &[f64], style: FillStyle);

    /// Vertical line spanning the full y-range
    fn axvline(&mut self, x: f64, style: LineStyle);

    /// Text anchored at a data coordinate
    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle);

    fn xlim(&self) -> (f64, f64);
    fn ylim(&self) -> (f64, f64);

    /// Pin the x-limits; later draws no longer rescale x
    fn set_xlim(&mut self, lo: f64, hi: f64);

    /// Pin the y-limits; later draws no longer rescale y
    fn set_ylim(&mut self, lo: f64, hi: f64);

    fn set_xticks(&mut self, ticks: Vec<Tick>);
    fn set_xlabel(&mut self, text: &str, font_size: f32);
    fn set_ylabel(&mut self, text: &str, font_size: f32);
    fn hide_spine(&mut self, spine: Spine);
    fn set_x_axis(&mut self, kind: AxisKind);
}

// ============================================================================
// Figure
// ============================================================================

/// A primitive recorded by a [`Figure`]
#[derive(Clone, Debug, PartialEq)]
pub enum Artist {
    Line {
        points: Vec<[f64; 2]>,
        style: LineStyle,
    },
    Scatter {
        points: Vec<[f64; 2]>,
        style: MarkerStyle,
    },
    Fill {
        xs: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        style: FillStyle,
    },
    VLine {
        x: f64,
        style: LineStyle,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// Running min/max of data drawn along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Extent {
    bounds: Option<(f64, f64)>,
}

impl Extent {
    fn include(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    fn autoscaled(&self) -> (f64, f64) {
        let Some((lo, hi)) = self.bounds else {
            return (0.0, 1.0);
        };
        let span = hi - lo;
        if span.abs() < f64::EPSILON {
            let pad = (lo.abs() * AXIS_MARGIN).max(0.5);
            return (lo - pad, hi + pad);
        }
        (lo - span * AXIS_MARGIN, hi + span * AXIS_MARGIN)
    }
}

/// Recording canvas holding a single set of axes
#[derive(Clone, Debug)]
pub struct Figure {
    /// Width and height in inches
    pub size: [f32; 2],
    artists: Vec<Artist>,
    x_extent: Extent,
    y_extent: Extent,
    x_limits: Option<(f64, f64)>,
    y_limits: Option<(f64, f64)>,
    x_ticks: Option<Vec<Tick>>,
    x_label: Option<AxisLabel>,
    y_label: Option<AxisLabel>,
    hidden_spines: Vec<Spine>,
    x_axis: AxisKind,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(DEFAULT_FIGURE_SIZE)
    }
}

impl Figure {
    pub fn new(size: [f32; 2]) -> Self {
        Self {
            size,
            artists: Vec::new(),
            x_extent: Extent::default(),
            y_extent: Extent::default(),
            x_limits: None,
            y_limits: None,
            x_ticks: None,
            x_label: None,
            y_label: None,
            hidden_spines: Vec::new(),
            x_axis: AxisKind::Linear,
        }
    }

    /// Everything drawn so far, in draw order
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[[f64; 2]], &LineStyle)> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Line { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn scatters(&self) -> impl Iterator<Item = (&[[f64; 2]], &MarkerStyle)> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Scatter { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Fill { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = (f64, f64, &str)> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
    }

    pub fn x_ticks(&self) -> Option<&[Tick]> {
        self.x_ticks.as_deref()
    }

    pub fn x_label(&self) -> Option<&AxisLabel> {
        self.x_label.as_ref()
    }

    pub fn y_label(&self) -> Option<&AxisLabel> {
        self.y_label.as_ref()
    }

    pub fn x_axis(&self) -> AxisKind {
        self.x_axis
    }

    pub fn spine_visible(&self, spine: Spine) -> bool {
        !self.hidden_spines.contains(&spine)
    }

    /// Format an x value the way the axis presents it
    pub fn format_x(&self, x: f64) -> String {
        if let Some(tick) = self
            .x_ticks
            .as_ref()
            .and_then(|ticks| ticks.iter().find(|t| (t.value - x).abs() < 1e-9))
        {
            return tick.label.clone();
        }
        match self.x_axis {
            AxisKind::Linear => format_number(x),
            AxisKind::DateTime => x_to_time(x)
                .map(|t| t.format("%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }

    /// Explicit x ticks inside the current limits, or generated ones
    pub fn resolved_x_ticks(&self) -> Vec<Tick> {
        let (lo, hi) = self.xlim();
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        if let Some(ticks) = &self.x_ticks {
            return ticks
                .iter()
                .filter(|t| t.value >= lo - 1e-9 && t.value <= hi + 1e-9)
                .cloned()
                .collect();
        }
        let values = match self.x_axis {
            AxisKind::Linear => nice_ticks(lo, hi, MAX_AUTO_TICKS),
            AxisKind::DateTime => time_ticks(lo, hi, MAX_AUTO_TICKS),
        };
        values
            .into_iter()
            .map(|v| Tick::new(v, self.format_x(v)))
            .collect()
    }

    pub fn resolved_y_ticks(&self) -> Vec<Tick> {
        let (lo, hi) = self.ylim();
        nice_ticks(lo.min(hi), lo.max(hi), MAX_AUTO_TICKS)
            .into_iter()
            .map(|v| Tick::new(v, format_number(v)))
            .collect()
    }

    fn include_points(&mut self, xs: &[f64], ys: &[f64]) {
        for (&x, &y) in xs.iter().zip(ys) {
            self.x_extent.include(x);
            self.y_extent.include(y);
        }
    }
}

/// Upper bound on generated tick count per axis
pub const MAX_AUTO_TICKS: usize = 8;

/// Round-number ticks (1, 2, 2.5, 5 x 10^k steps) covering `lo..=hi`
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || max_ticks == 0 {
        return Vec::new();
    }
    let raw = (hi - lo) / max_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    ticks_from(lo, hi, step)
}

/// Clock-aligned ticks for a date-time axis in seconds
pub fn time_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    const STEPS: [f64; 13] = [
        60.0, 300.0, 600.0, 900.0, 1800.0, 3600.0, 7200.0, 10800.0, 21600.0, 43200.0, 86400.0,
        172800.0, 604800.0,
    ];
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || max_ticks == 0 {
        return Vec::new();
    }
    let span = hi - lo;
    match STEPS.iter().find(|&&s| span / s <= max_ticks as f64) {
        Some(&step) => ticks_from(lo, hi, step),
        None => nice_ticks(lo, hi, max_ticks),
    }
}

fn ticks_from(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let start = (lo / step).ceil() * step;
    (0..)
        .map(|k| start + k as f64 * step)
        .take_while(|v| *v <= hi + step * 1e-9)
        .collect()
}

/// Compact number formatting for tick labels
pub fn format_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

impl Canvas for Figure {
    fn line(&mut self, xs: &[f64], ys: &[f64], style: LineStyle) {
        self.include_points(xs, ys);
        let points = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();
        self.artists.push(Artist::Line { points, style });
    }

    fn scatter(&mut self, xs: &[f64], ys: &[f64], style: MarkerStyle) {
        self.include_points(xs, ys);
        let points = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();
        self.artists.push(Artist::Scatter { points, style });
    }

    fn fill_between(&mut self, xs: &[f64], lower: &[f64], upper: &[f64], style: FillStyle) {
        let n = xs.len().min(lower.len()).min(upper.len());
        self.include_points(&xs[..n], &lower[..n]);
        self.include_points(&xs[..n], &upper[..n]);
        self.artists.push(Artist::Fill {
            xs: xs[..n].to_vec(),
            lower: lower[..n].to_vec(),
            upper: upper[..n].to_vec(),
            style,
        });
    }

    fn axvline(&mut self, x: f64, style: LineStyle) {
        self.x_extent.include(x);
        self.artists.push(Artist::VLine { x, style });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        self.artists.push(Artist::Text {
            x,
            y,
            text: text.to_string(),
            style,
        });
    }

    fn xlim(&self) -> (f64, f64) {
        self.x_limits.unwrap_or_else(|| self.x_extent.autoscaled())
    }

    fn ylim(&self) -> (f64, f64) {
        self.y_limits.unwrap_or_else(|| self.y_extent.autoscaled())
    }

    fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.x_limits = Some((lo, hi));
    }

    fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.y_limits = Some((lo, hi));
    }

    fn set_xticks(&mut self, ticks: Vec<Tick>) {
        self.x_ticks = Some(ticks);
    }

    fn set_xlabel(&mut self, text: &str, font_size: f32) {
        self.x_label = Some(AxisLabel {
            text: text.to_string(),
            font_size,
        });
    }

    fn set_ylabel(&mut self, text: &str, font_size: f32) {
        self.y_label = Some(AxisLabel {
            text: text.to_string(),
            font_size,
        });
    }

    fn hide_spine(&mut self, spine: Spine) {
        if !self.hidden_spines.contains(&spine) {
            self.hidden_spines.push(spine);
        }
    }

    fn set_x_axis(&mut self, kind: AxisKind) {
        self.x_axis = kind;
    }
}
