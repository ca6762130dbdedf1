//! PriceSeries: the columnar input table the engine walks row by row.
//!
//! One strictly increasing timestamp index plus any number of named `f64`
//! columns of the same length. Missing cells are stored as `NaN`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamp at row {index} ({current}) is not after the previous row ({previous})")]
    NonIncreasingTimestamp {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("column '{column}' has {actual} rows, series has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Time-indexed table of numeric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    timestamps: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PriceSeries {
    /// Create a series with the given index and no columns.
    ///
    /// Fails if any timestamp is not strictly after its predecessor; the
    /// engine neither deduplicates nor reorders rows.
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Result<Self, SeriesError> {
        for (i, pair) in timestamps.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NonIncreasingTimestamp {
                    index: i + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            timestamps,
            columns: BTreeMap::new(),
        })
    }

    /// Builder form of [`insert_column`](Self::insert_column).
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add or replace a column. Its length must match the index.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SeriesError> {
        let name = name.into();
        if values.len() != self.timestamps.len() {
            return Err(SeriesError::LengthMismatch {
                column: name,
                expected: self.timestamps.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn timestamp(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps.get(index).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Single cell lookup; `None` if the column or row does not exist.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.get(index)).copied()
    }

    /// Cell of the last row strictly before `time`.
    pub fn value_before(&self, name: &str, time: DateTime<Utc>) -> Option<f64> {
        let index = self.timestamps.partition_point(|t| *t < time).checked_sub(1)?;
        self.value(name, index)
    }

    /// Rows whose timestamp lies in `[start, end]`. Open bounds are unbounded.
    pub fn slice_by_time(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> PriceSeries {
        let lo = start.map_or(0, |s| self.timestamps.partition_point(|t| *t < s));
        let hi = end.map_or(self.timestamps.len(), |e| {
            self.timestamps.partition_point(|t| *t <= e)
        });
        let hi = hi.max(lo);

        PriceSeries {
            timestamps: self.timestamps[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[lo..hi].to_vec()))
                .collect(),
        }
    }
}
