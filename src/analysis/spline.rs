//! Cubic-spline interpolation and fixed-step resampling.
//!
//! The spline uses not-a-knot end conditions: the third derivative is
//! continuous across the second and the second-to-last knots. With exactly
//! four knots this is the single cubic through all of them.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::series::{GlucoseReading, GlucoseSeries};

/// Minimum number of knots for a not-a-knot spline
pub const MIN_SPLINE_POINTS: usize = 4;

/// Resampling resolution used by the smoothed trace and the AGP
pub const RESAMPLE_STEP_SECONDS: i64 = 60;

/// Piecewise cubic `a + b*dx + c*dx^2 + d*dx^3` on each knot interval
#[derive(Clone, Debug)]
pub struct CubicSpline {
    xs: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Fit a not-a-knot spline through `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing and every value finite.
    pub fn not_a_knot(xs: &[f64], ys: &[f64]) -> Result<Self> {
        let n = xs.len().min(ys.len());
        if n < MIN_SPLINE_POINTS {
            return Err(PlotError::InsufficientData {
                needed: MIN_SPLINE_POINTS,
                got: n,
            });
        }
        let xs = &xs[..n];
        let ys = &ys[..n];
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(PlotError::NonFiniteValue);
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PlotError::NonIncreasingTime { index: i + 1 });
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Second derivatives M[1..n-1] from a tridiagonal system; the
        // not-a-knot rows have M[0] and M[n-1] substituted out.
        let m = n - 2;
        let mut sub = vec![0.0; m];
        let mut diag = vec![0.0; m];
        let mut sup = vec![0.0; m];
        let mut rhs = vec![0.0; m];
        for k in 0..m {
            let i = k + 1;
            sub[k] = h[i - 1];
            diag[k] = 2.0 * (h[i - 1] + h[i]);
            sup[k] = h[i];
            rhs[k] = 6.0 * (slope[i] - slope[i - 1]);
        }

        let (h0, h1) = (h[0], h[1]);
        diag[0] += h0 * (h0 + h1) / h1;
        sup[0] -= h0 * h0 / h1;

        let (hp, hl) = (h[n - 3], h[n - 2]);
        diag[m - 1] += hl * (hp + hl) / hp;
        sub[m - 1] -= hl * hl / hp;

        let interior = solve_tridiagonal(&sub, &mut diag, &sup, &mut rhs);

        let mut second = Vec::with_capacity(n);
        second.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        second.extend_from_slice(&interior);
        second.push(((hp + hl) * interior[m - 1] - hl * interior[m - 2]) / hp);

        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        let mut d = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            a.push(ys[i]);
            b.push(slope[i] - h[i] * (2.0 * second[i] + second[i + 1]) / 6.0);
            c.push(second[i] / 2.0);
            d.push((second[i + 1] - second[i]) / (6.0 * h[i]));
        }
        // Keep the final knot value for exact evaluation at the right edge
        a.push(ys[n - 1]);

        Ok(Self {
            xs: xs.to_vec(),
            a,
            b,
            c,
            d,
        })
    }

    /// First and last knot
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Value at `x`; `None` outside the knot range (no extrapolation)
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return None;
        }
        let last = self.xs.len() - 1;
        if x == hi {
            return Some(self.a[last]);
        }
        let i = (self.xs.partition_point(|&k| k <= x) - 1).min(last - 1);
        let dx = x - self.xs[i];
        Some(self.a[i] + dx * (self.b[i] + dx * (self.c[i] + dx * self.d[i])))
    }
}

/// Thomas algorithm; `diag` and `rhs` are overwritten
fn solve_tridiagonal(sub: &[f64], diag: &mut [f64], sup: &[f64], rhs: &mut [f64]) -> Vec<f64> {
    let m = diag.len();
    for k in 1..m {
        let w = sub[k] / diag[k - 1];
        diag[k] -= w * sup[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    let mut out = vec![0.0; m];
    out[m - 1] = rhs[m - 1] / diag[m - 1];
    for k in (0..m - 1).rev() {
        out[k] = (rhs[k] - sup[k] * out[k + 1]) / diag[k];
    }
    out
}

fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Resample a series onto a uniform grid anchored at its first timestamp.
///
/// Grid points run from the first reading up to (not past) the last one, so
/// nothing is extrapolated.
pub fn resample(series: &GlucoseSeries, step: Duration) -> Result<GlucoseSeries> {
    let readings = series.readings();
    let Some(first) = readings.first() else {
        return Err(PlotError::InsufficientData {
            needed: MIN_SPLINE_POINTS,
            got: 0,
        });
    };
    let t0 = first.time;
    let xs: Vec<f64> = readings.iter().map(|r| seconds_between(t0, r.time)).collect();
    let ys: Vec<f64> = readings.iter().map(|r| r.value).collect();
    let spline = CubicSpline::not_a_knot(&xs, &ys)?;

    let step_secs = step.num_milliseconds() as f64 / 1000.0;
    if step_secs <= 0.0 {
        return Err(PlotError::DegenerateRange { axis: "time" });
    }
    let (_, end) = spline.domain();
    let count = (end / step_secs).floor() as i64 + 1;

    let mut out = Vec::with_capacity(count.max(0) as usize);
    for k in 0..count {
        let time = t0 + step * k as i32;
        if let Some(value) = spline.evaluate(seconds_between(t0, time)) {
            out.push(GlucoseReading { time, value });
        }
    }

    debug!(
        input = readings.len(),
        output = out.len(),
        step_secs,
        "resampled glucose series"
    );
    Ok(GlucoseSeries::new(out))
}

/// Resample at [`RESAMPLE_STEP_SECONDS`] resolution
pub fn resample_per_minute(series: &GlucoseSeries) -> Result<GlucoseSeries> {
    resample(series, Duration::seconds(RESAMPLE_STEP_SECONDS))
}
