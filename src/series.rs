//! Typed CGM, meal and sleep records.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::Table;

/// One glucose sample in mg/dL
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    pub time: NaiveDateTime,
    pub value: f64,
}

impl GlucoseReading {
    pub fn new(time: NaiveDateTime, value: f64) -> Self {
        Self { time, value }
    }

    /// Minutes since midnight, 0..=1439
    pub fn minute_of_day(&self) -> u16 {
        (self.time.hour() * 60 + self.time.minute()) as u16
    }
}

/// Glucose samples ordered by time.
///
/// Ordering is not checked here; computations that need strictly increasing
/// timestamps report a violation themselves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSeries {
    readings: Vec<GlucoseReading>,
}

impl GlucoseSeries {
    pub fn new(readings: Vec<GlucoseReading>) -> Self {
        Self { readings }
    }

    /// Build from the timestamp and value columns of a table
    pub fn from_table(table: &Table, time_col: &str, value_col: &str) -> Result<Self> {
        let times = table.datetimes(time_col)?;
        let values = table.numbers(value_col)?;
        Ok(Self::new(
            times
                .iter()
                .zip(values)
                .map(|(&time, &value)| GlucoseReading { time, value })
                .collect(),
        ))
    }

    pub fn readings(&self) -> &[GlucoseReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        self.readings.iter().map(|r| r.time).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.readings.iter().map(|r| r.value).reduce(f64::max)
    }
}

impl From<Vec<GlucoseReading>> for GlucoseSeries {
    fn from(readings: Vec<GlucoseReading>) -> Self {
        Self::new(readings)
    }
}

/// A logged meal item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEvent {
    pub time: NaiveDateTime,
    pub label: String,
}

impl MealEvent {
    pub fn new(time: NaiveDateTime, label: impl Into<String>) -> Self {
        Self {
            time,
            label: label.into(),
        }
    }

    pub fn from_table(table: &Table, time_col: &str, label_col: &str) -> Result<Vec<Self>> {
        let times = table.datetimes(time_col)?;
        let labels = table.texts(label_col)?;
        Ok(times
            .iter()
            .zip(labels)
            .map(|(&time, label)| MealEvent::new(time, label.clone()))
            .collect())
    }
}

/// A sleep window, `start < end`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SleepInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

impl From<(NaiveDateTime, NaiveDateTime)> for SleepInterval {
    fn from((start, end): (NaiveDateTime, NaiveDateTime)) -> Self {
        Self::new(start, end)
    }
}
