//! Minimal named-column table used as plotting input.

use chrono::NaiveDateTime;

use crate::error::{PlotError, Result};

/// Column storage; every column in a table has the same length
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    DateTime(Vec<NaiveDateTime>),
    Number(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::DateTime(v) => v.len(),
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tabular dataset with named, equally sized columns
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column. Fails if its length differs from the table's.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if let Some((_, first)) = self.columns.iter().find(|(n, _)| *n != name) {
            if first.len() != column.len() {
                return Err(PlotError::ColumnLength {
                    name,
                    expected: first.len(),
                    got: column.len(),
                });
            }
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        Ok(self)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| PlotError::MissingColumn(name.to_string()))
    }

    pub fn datetimes(&self, name: &str) -> Result<&[NaiveDateTime]> {
        match self.column(name)? {
            Column::DateTime(v) => Ok(v),
            _ => Err(PlotError::ColumnType {
                name: name.to_string(),
                expected: "date-time",
            }),
        }
    }

    pub fn numbers(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Number(v) => Ok(v),
            _ => Err(PlotError::ColumnType {
                name: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    pub fn texts(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            _ => Err(PlotError::ColumnType {
                name: name.to_string(),
                expected: "text",
            }),
        }
    }
}
