//! glucoplot - glucose charts and age/gender reference percentiles
//!
//! This library builds three kinds of charts on a shared drawing surface:
//! population reference percentile curves, continuous glucose traces with
//! meal and sleep annotations, and the ambulatory glucose profile.
//!
//! ## Module Structure
//!
//! - [`canvas`] - Drawing-surface trait and the recording [`canvas::Figure`]
//! - [`style`] - Colors, palettes and line/marker/fill/text styles
//! - [`table`] - Minimal typed column table used as chart input
//! - [`series`] - Glucose readings, meal events and sleep intervals
//! - [`analysis`] - Spline smoothing, resampling and quantile statistics
//! - [`reference`] - Reference percentile table loading and selection
//! - [`plots`] - The chart builders
//!   - `reference` - Percentile curves with shaded bands by age
//!   - `cgm` - Glucose trace with meal and sleep overlays
//!   - `agp` - Ambulatory glucose profile
//! - [`export`] - PNG and PDF output
//! - [`viewer`] - egui display of a figure
//! - [`app`] - Reference-band explorer (eframe::App)
//! - [`settings`] - User settings persistence
//! - [`error`] - Error type shared by every fallible operation

pub mod analysis;
pub mod app;
pub mod canvas;
pub mod error;
pub mod export;
pub mod plots;
pub mod reference;
pub mod series;
pub mod settings;
pub mod style;
pub mod table;
pub mod viewer;

pub use canvas::{Canvas, Figure};
pub use error::{PlotError, Result};
