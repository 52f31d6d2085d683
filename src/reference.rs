//! Age/gender reference percentiles.
//!
//! The reference file is comma-delimited with a header row. Recognised
//! columns are `Value` (variable name), `Gender`, `Age group` and one column
//! per percentile named by its number (`3`, `10`, `50`, ...). Any other
//! column, such as a leading row index, is ignored.
//!
//! ```text
//! ,Value,Gender,Age group,3,10,25,50,75,90,97
//! 0,BMI,Female,40,19.1,20.4,22.5,25.1,28.4,32.0,35.3
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

use crate::error::{PlotError, Result};

/// Reference file used when the caller supplies no table
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference_percentiles.csv";

/// Gender key of a reference row
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumIter, EnumString, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    Female,
    Male,
    All,
}

/// One (variable, gender, age group) row
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRow {
    pub variable: String,
    pub gender: Gender,
    /// Age in years; range buckets use their midpoint
    pub age: f64,
    pub percentiles: BTreeMap<u8, f64>,
}

impl ReferenceRow {
    pub fn percentile(&self, p: u8) -> Option<f64> {
        self.percentiles.get(&p).copied()
    }
}

/// Read-only reference percentile table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceTable {
    percentiles: Vec<u8>,
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn new(percentiles: Vec<u8>, rows: Vec<ReferenceRow>) -> Self {
        Self { percentiles, rows }
    }

    /// Load from [`DEFAULT_REFERENCE_PATH`]
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_REFERENCE_PATH)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
        let table = Self::parse(&contents)?;
        info!(
            path = %path.display(),
            rows = table.rows.len(),
            "loaded reference table"
        );
        Ok(table)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Err(PlotError::ReferenceParse {
                line: 1,
                message: "empty reference file".to_string(),
            });
        };
        let header: Vec<&str> = header.split(',').map(|c| c.trim()).collect();
        let find = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| PlotError::ReferenceParse {
                    line: 1,
                    message: format!("missing '{}' column", name),
                })
        };
        let value_idx = find("Value")?;
        let gender_idx = find("Gender")?;
        let age_idx = find("Age group")?;

        let percentile_cols: Vec<(usize, u8)> = header
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != value_idx && i != gender_idx && i != age_idx)
            .filter_map(|(i, h)| h.parse::<u8>().ok().map(|p| (i, p)))
            .filter(|&(_, p)| p <= 100)
            .collect();
        if percentile_cols.is_empty() {
            return Err(PlotError::ReferenceParse {
                line: 1,
                message: "no percentile columns".to_string(),
            });
        }

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let cells: Vec<&str> = line.split(',').map(|c| c.trim()).collect();
            let cell = |i: usize| -> Result<&str> {
                cells.get(i).copied().ok_or_else(|| PlotError::ReferenceParse {
                    line: line_no,
                    message: format!("expected at least {} cells, got {}", i + 1, cells.len()),
                })
            };
            let parse_err = |message: String| PlotError::ReferenceParse {
                line: line_no,
                message,
            };

            let variable = cell(value_idx)?.to_string();
            let gender_text = cell(gender_idx)?;
            let gender: Gender = gender_text
                .parse()
                .map_err(|_| parse_err(format!("unknown gender '{}'", gender_text)))?;
            let age_text = cell(age_idx)?;
            let age = parse_age(age_text)
                .ok_or_else(|| parse_err(format!("invalid age group '{}'", age_text)))?;

            let mut percentiles = BTreeMap::new();
            for &(col, p) in &percentile_cols {
                let text = cell(col)?;
                let value: f64 = text
                    .parse()
                    .map_err(|_| parse_err(format!("invalid value '{}' for percentile {}", text, p)))?;
                percentiles.insert(p, value);
            }

            rows.push(ReferenceRow {
                variable,
                gender,
                age,
                percentiles,
            });
        }

        let mut percentiles: Vec<u8> = percentile_cols.iter().map(|&(_, p)| p).collect();
        percentiles.sort_unstable();
        Ok(Self { percentiles, rows })
    }

    /// Percentile columns present in the table, ascending
    pub fn percentiles(&self) -> &[u8] {
        &self.percentiles
    }

    pub fn has_percentile(&self, p: u8) -> bool {
        self.percentiles.contains(&p)
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Distinct variable names, sorted
    pub fn variables(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.variable.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn genders_for(&self, variable: &str) -> Vec<Gender> {
        self.rows
            .iter()
            .filter(|r| r.variable == variable)
            .map(|r| r.gender)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows for one variable and gender, ordered by age.
    /// Fails when nothing matches.
    pub fn select(&self, variable: &str, gender: Gender) -> Result<Vec<&ReferenceRow>> {
        let mut rows: Vec<&ReferenceRow> = self
            .rows
            .iter()
            .filter(|r| r.variable == variable && r.gender == gender)
            .collect();
        if rows.is_empty() {
            return Err(PlotError::ReferenceNotFound {
                variable: variable.to_string(),
                gender: gender.to_string(),
            });
        }
        rows.sort_by(|a, b| a.age.total_cmp(&b.age));
        Ok(rows)
    }
}

/// `"45"` or `"45-49"` (midpoint)
fn parse_age(text: &str) -> Option<f64> {
    match text.split_once('-') {
        Some((lo, hi)) => {
            let lo: f64 = lo.trim().parse().ok()?;
            let hi: f64 = hi.trim().parse().ok()?;
            Some((lo + hi) / 2.0)
        }
        None => text.parse().ok(),
    }
}
