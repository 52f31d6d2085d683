//! Error type shared by every plotting routine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing data for a chart or exporting it
#[derive(Debug, Error)]
pub enum PlotError {
    /// No reference rows exist for the requested variable and gender
    #[error("no reference data for variable '{variable}' and gender '{gender}'")]
    ReferenceNotFound { variable: String, gender: String },

    /// A requested percentile has no column in the reference table
    #[error("reference table has no column for percentile {0}")]
    MissingPercentile(u8),

    /// Reference file could not be parsed
    #[error("reference data line {line}: {message}")]
    ReferenceParse { line: usize, message: String },

    /// Not enough points for the requested computation
    #[error("insufficient data: need {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A value or timestamp was NaN or infinite
    #[error("series contains a non-finite value")]
    NonFiniteValue,

    /// Timestamps must be strictly increasing
    #[error("timestamps are not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },

    /// Axis limits cannot be mapped to a drawing area
    #[error("degenerate {axis} axis range")]
    DegenerateRange { axis: &'static str },

    /// Table has no column with the requested name
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Table column exists but holds another kind of data
    #[error("column '{name}' is not a {expected} column")]
    ColumnType {
        name: String,
        expected: &'static str,
    },

    /// Columns of a table must all have the same length
    #[error("column '{name}' has {got} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("settings error: {0}")]
    Settings(String),
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = PlotError> = std::result::Result<T, E>;
