//! Candle-start gate: only pass signals on the first row of each signal-timeframe candle.
//!
//! Signals computed on a coarse timeframe are forward-filled onto every row
//! of the execution timeframe. Without the gate one 15-minute setup would be
//! offered to the engine thirty times on a 30-second series.

use crate::domain::{PriceSeries, Signal, Timeframe};

use super::{SignalError, SignalSource};

pub struct CandleStartGate<S> {
    inner: S,
    open_column: String,
    previous_open: Option<f64>,
}

impl<S: SignalSource> CandleStartGate<S> {
    /// Gate `inner` on changes of `open_<timeframe>` in `series`.
    pub fn new(inner: S, timeframe: &Timeframe, series: &PriceSeries) -> Result<Self, SignalError> {
        let open_column = timeframe.open_column();
        if !series.has_column(&open_column) {
            return Err(SignalError::MissingColumn(open_column));
        }
        Ok(Self {
            inner,
            open_column,
            previous_open: None,
        })
    }

    /// Continue a gate over a series cut from a longer one.
    ///
    /// `open` is the `open_<tf>` value of the row just before the cut, so a
    /// candle that started earlier is not treated as new on row 0.
    pub fn with_previous_open(mut self, open: Option<f64>) -> Self {
        self.previous_open = open;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_candle_start(&self, series: &PriceSeries, index: usize) -> bool {
        let previous = match index.checked_sub(1) {
            Some(prev) => series.value(&self.open_column, prev),
            None if self.previous_open.is_none() => return true,
            None => self.previous_open,
        };
        match (series.value(&self.open_column, index), previous) {
            // NaN != NaN, so blank opens count as a new candle.
            (Some(current), Some(previous)) => current != previous,
            _ => false,
        }
    }
}

impl<S: SignalSource> SignalSource for CandleStartGate<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn produce_signal(&self, series: &PriceSeries, index: usize) -> Option<Signal> {
        if !self.is_candle_start(series, index) {
            return None;
        }
        self.inner.produce_signal(series, index)
    }
}
