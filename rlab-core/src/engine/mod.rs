//! Trade-simulation engine: lifecycle, admission policy and ledger.
//!
//! The engine consumes a [`PriceSeries`](crate::domain::PriceSeries) and a
//! [`SignalSource`](crate::signals::SignalSource), then runs the two-phase
//! row loop:
//!
//! 1. Exits: arm breakeven, then stop-loss before take-profit
//! 2. Entry: admission policy, position creation

pub mod admission;
pub mod config;
pub mod events;
pub mod ledger;
pub mod loop_runner;
pub mod state;

pub use admission::{Admission, Rejection, ValidatedEntry};
pub use config::{ConfigError, EngineConfig};
pub use events::{EngineEvent, EngineObserver, LogObserver, NullObserver, RecordingObserver};
pub use ledger::TradeLedger;
pub use loop_runner::{run_backtest, run_backtest_observed, EngineError};
pub use state::EngineState;
