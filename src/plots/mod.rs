//! The three chart builders. They are independent of each other and share
//! only the [`Canvas`](crate::canvas::Canvas) they draw on.
//!
//! - [`reference`] - age/gender percentile curves with shaded bands
//! - [`cgm`] - glucose trace with meal and sleep overlays
//! - [`agp`] - ambulatory glucose profile

pub mod agp;
pub mod cgm;
pub mod reference;

pub use agp::{Agp, AgpBucket};
pub use cgm::{CgmColumns, CgmPlot};
pub use reference::{age_reference_figure, plot_age_reference, DEFAULT_PERCENTILES};
