//! Bar-by-bar loop: walks the series once and returns the trade ledger.
//!
//! Two phases per row:
//! 1. Exits: breakeven check, then stop-loss/take-profit for every open position
//! 2. Entry: ask the signal source, run admission, open a position
//!
//! Exits run first so a slot closed on a row can be refilled on that row.
//! A position opened on row t is first checked for exits on row t+1.

use crate::domain::{PriceSeries, Timeframe};
use crate::signals::SignalSource;
use thiserror::Error;

use super::config::{ConfigError, EngineConfig};
use super::events::{EngineEvent, EngineObserver, NullObserver};
use super::ledger::TradeLedger;
use super::state::EngineState;

/// Errors that stop a run before any row is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),

    #[error("execution timeframe '{timeframe}' needs columns '{high}' and '{low}', not found in price series")]
    MissingExecutionColumns {
        timeframe: Timeframe,
        high: String,
        low: String,
    },
}

/// Run a backtest with no observer.
pub fn run_backtest(
    series: &PriceSeries,
    signals: &dyn SignalSource,
    config: &EngineConfig,
) -> Result<TradeLedger, EngineError> {
    run_backtest_observed(series, signals, config, &mut NullObserver)
}

/// Run a backtest, reporting lifecycle events to `observer`.
///
/// Fails fast if the config is invalid or the execution timeframe's
/// high/low columns are missing, even for an empty series.
pub fn run_backtest_observed(
    series: &PriceSeries,
    signals: &dyn SignalSource,
    config: &EngineConfig,
    observer: &mut dyn EngineObserver,
) -> Result<TradeLedger, EngineError> {
    config.validate()?;
    let (highs, lows) = execution_columns(series, &config.execution_timeframe)?;

    let mut state = EngineState::new();

    for (t, &time) in series.timestamps().iter().enumerate() {
        // ─── Phase 1: exits ───
        state.resolve_exits(time, highs[t], lows[t], config.use_breakeven, observer);

        // ─── Phase 2: entry ───
        if let Some(signal) = signals.produce_signal(series, t) {
            state.consider_entry(time, &signal, config, observer);
        }
    }

    observer.on_event(&EngineEvent::RunCompleted {
        rows: series.len(),
        trades: state.ledger().len(),
        still_open: state.open_positions().len(),
    });

    Ok(state.into_ledger())
}

fn execution_columns<'a>(
    series: &'a PriceSeries,
    timeframe: &Timeframe,
) -> Result<(&'a [f64], &'a [f64]), EngineError> {
    let high = timeframe.high_column();
    let low = timeframe.low_column();
    match (series.column(&high), series.column(&low)) {
        (Some(h), Some(l)) => Ok((h, l)),
        _ => Err(EngineError::MissingExecutionColumns {
            timeframe: timeframe.clone(),
            high,
            low,
        }),
    }
}
