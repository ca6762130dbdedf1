//! Signal sources: per-row entry candidates consumed by the engine.
//!
//! Pattern detection lives outside this crate. A strategy only has to answer
//! "is there an entry at this row, and at what entry/stop?", which is the
//! whole of [`SignalSource`]. Sources are read-only over the series and never
//! see engine state.

pub mod candle_start;
pub mod column;
pub mod filter;

pub use candle_start::CandleStartGate;
pub use column::ColumnSignals;
pub use filter::{filter_column, FilterMask};

use crate::domain::{PriceSeries, Signal};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("signal column '{0}' not found in price series")]
    MissingColumn(String),

    #[error("row {row}: signal value {value} is not one of -1, 0, 1")]
    InvalidDirection { row: usize, value: f64 },
}

/// Capability interface every strategy implements.
pub trait SignalSource: Send + Sync {
    /// Human-readable name (e.g., "columns").
    fn name(&self) -> &str;

    /// The entry candidate at `index`, if any.
    ///
    /// Implementations may only look at rows `0..=index`.
    fn produce_signal(&self, series: &PriceSeries, index: usize) -> Option<Signal>;
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn produce_signal(&self, series: &PriceSeries, index: usize) -> Option<Signal> {
        (**self).produce_signal(series, index)
    }
}

/// Source that never signals. Useful for tests that only exercise the loop.
pub struct NullSignal;

impl SignalSource for NullSignal {
    fn name(&self) -> &str {
        "null"
    }

    fn produce_signal(&self, _series: &PriceSeries, _index: usize) -> Option<Signal> {
        None
    }
}
