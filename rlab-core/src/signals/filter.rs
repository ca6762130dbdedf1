//! Filter mask: pass signals only on rows where every selected `filter_<name>` column is set.

use crate::domain::{PriceSeries, Signal};

use super::{SignalError, SignalSource};

pub const FILTER_PREFIX: &str = "filter_";

/// Mask column for the filter called `name`.
pub fn filter_column(name: &str) -> String {
    format!("{FILTER_PREFIX}{name}")
}

/// ANDs boolean mask columns onto an inner source.
///
/// A cell is set when it is finite and non-zero. Blank cells are unset.
/// With no filters the mask passes every signal.
pub struct FilterMask<S> {
    inner: S,
    columns: Vec<String>,
}

impl<S: SignalSource> FilterMask<S> {
    pub fn new(inner: S, filters: &[String], series: &PriceSeries) -> Result<Self, SignalError> {
        let columns: Vec<String> = filters.iter().map(|f| filter_column(f)).collect();
        if let Some(missing) = columns.iter().find(|c| !series.has_column(c)) {
            return Err(SignalError::MissingColumn(missing.clone()));
        }
        Ok(Self { inner, columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn passes(&self, series: &PriceSeries, index: usize) -> bool {
        self.columns.iter().all(|c| {
            series
                .value(c, index)
                .is_some_and(|v| v.is_finite() && v != 0.0)
        })
    }
}

impl<S: SignalSource> SignalSource for FilterMask<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn produce_signal(&self, series: &PriceSeries, index: usize) -> Option<Signal> {
        if !self.passes(series, index) {
            return None;
        }
        self.inner.produce_signal(series, index)
    }
}
