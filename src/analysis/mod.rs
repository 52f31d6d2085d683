//! Numeric building blocks for the plotters.
//!
//! - [`spline`] - not-a-knot cubic spline and fixed-step resampling
//! - [`statistics`] - linear-interpolated quantiles and median

pub mod spline;
pub mod statistics;

pub use spline::{resample, resample_per_minute, CubicSpline};
pub use statistics::{median, quantile, quantiles};
