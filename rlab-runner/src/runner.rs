//! Scenario runner: wires together data, signals, engine, session filter and stats.
//!
//! Entry points:
//! - `run_from_config()`: loads the CSV named in a `BacktestConfig` and sweeps
//!   every filter subset and scenario. Used by the CLI `run` command.
//! - `run_scenarios()`: pre-loaded series + signal source, parallel sweep.
//! - `run_scenario()`: one engine run plus session filter and statistics.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rlab_core::domain::{PriceSeries, Timeframe, TradeRecord};
use rlab_core::engine::{run_backtest_observed, EngineConfig, EngineError, LogObserver};
use rlab_core::signals::{
    CandleStartGate, ColumnSignals, FilterMask, SignalError, SignalSource,
};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_csv, LoadError};
use crate::metrics::{RReport, RStats};
use crate::scenario::FilterCombo;
use crate::session::SessionWindow;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("signal error: {0}")]
    Signals(#[from] SignalError),
    #[error("scenario '{scenario}': {source}")]
    Engine {
        scenario: String,
        #[source]
        source: EngineError,
    },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    pub config: EngineConfig,
    /// Trades the engine produced before the session filter.
    pub candidate_count: usize,
    /// Digest of the unfiltered ledger.
    pub ledger_digest: String,
    /// Trades kept by the session filter, in closure order.
    pub trades: Vec<TradeRecord>,
    /// `None` when no trades were kept.
    pub report: Option<RReport>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ScenarioResult {
    pub fn overall(&self) -> Option<&RStats> {
        self.report.as_ref().map(|r| &r.overall)
    }
}

/// Run a single scenario on pre-loaded data. No I/O.
pub fn run_scenario(
    series: &PriceSeries,
    signals: &dyn SignalSource,
    name: &str,
    config: &EngineConfig,
    session: Option<&SessionWindow>,
) -> Result<ScenarioResult, RunError> {
    let ledger = run_backtest_observed(series, signals, config, &mut LogObserver).map_err(
        |source| RunError::Engine {
            scenario: name.to_string(),
            source,
        },
    )?;

    let candidate_count = ledger.len();
    let ledger_digest = ledger.digest();
    let trades = match session {
        Some(window) => {
            let kept = window.filter_trades(ledger.trades());
            log::info!(
                "{name}: session filter kept {} of {} trades",
                kept.len(),
                candidate_count
            );
            kept
        }
        None => ledger.into_trades(),
    };

    Ok(ScenarioResult {
        schema_version: SCHEMA_VERSION,
        name: name.to_string(),
        config: config.clone(),
        candidate_count,
        ledger_digest,
        report: RReport::compute(&trades),
        trades,
    })
}

/// Run every `(name, config)` pair in parallel. Results come back in input order.
pub fn run_scenarios(
    series: &PriceSeries,
    signals: &dyn SignalSource,
    scenarios: &[(String, EngineConfig)],
    session: Option<&SessionWindow>,
) -> Result<Vec<ScenarioResult>, RunError> {
    scenarios
        .par_iter()
        .map(|(name, config)| run_scenario(series, signals, name, config, session))
        .collect()
}

/// Column signals, gated to candle starts when a signal timeframe is given.
pub fn build_signals(
    series: &PriceSeries,
    signal_timeframe: Option<&Timeframe>,
) -> Result<Box<dyn SignalSource>, SignalError> {
    build_filtered_signals(series, signal_timeframe, &[], None)
}

/// Column signals masked by `filters`, then gated to candle starts.
///
/// `previous_open` is the signal-timeframe open just before `series` begins
/// when `series` was cut from a longer table.
pub fn build_filtered_signals(
    series: &PriceSeries,
    signal_timeframe: Option<&Timeframe>,
    filters: &[String],
    previous_open: Option<f64>,
) -> Result<Box<dyn SignalSource>, SignalError> {
    let masked = FilterMask::new(ColumnSignals::for_series(series)?, filters, series)?;
    let source: Box<dyn SignalSource> = match signal_timeframe {
        Some(tf) => Box::new(
            CandleStartGate::new(masked, tf, series)?.with_previous_open(previous_open),
        ),
        None => Box::new(masked),
    };
    Ok(source)
}

/// Restrict a loaded table to the configured date range.
fn restrict_to_dates(
    series: PriceSeries,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> PriceSeries {
    if start.is_none() && end.is_none() {
        return series;
    }
    let sliced = series.slice_by_time(start, end);
    log::info!(
        "date range kept {} of {} rows",
        sliced.len(),
        series.len()
    );
    sliced
}

/// Validate, load, and sweep every filter subset and scenario in `config`.
///
/// Candle starts are decided on the full table, so a candle that opened
/// before `start_date` does not count as new on the first kept row.
/// Results are filter-subset major, scenario order within a subset.
pub fn run_from_config(config: &BacktestConfig) -> Result<Vec<ScenarioResult>, RunError> {
    config.validate()?;
    let full = load_csv(&config.data.path)?;
    let (start, end) = config.time_bounds()?;
    let signal_timeframe = config.signals.signal_timeframe.as_ref();
    let previous_open = match (signal_timeframe, start) {
        (Some(tf), Some(start)) => full.value_before(&tf.open_column(), start),
        _ => None,
    };
    let series = restrict_to_dates(full, start, end);
    let session = config.session_window()?;
    let filtered = !config.signals.filters.is_empty();

    let mut results = Vec::new();
    for combo in FilterCombo::all(&config.signals.filters) {
        let signals =
            build_filtered_signals(&series, signal_timeframe, combo.filters(), previous_open)?;
        let scenarios: Vec<(String, EngineConfig)> = config
            .scenarios
            .iter()
            .map(|s| {
                let name = if filtered {
                    combo.scenario_name(s)
                } else {
                    s.name()
                };
                (
                    name,
                    s.engine_config(
                        &config.engine.execution_timeframe,
                        config.engine.allow_multiple_trades,
                    ),
                )
            })
            .collect();

        log::info!(
            "running {} scenarios ({}) on {} rows with {}",
            scenarios.len(),
            combo.name(),
            series.len(),
            signals.name()
        );
        results.extend(run_scenarios(
            &series,
            signals.as_ref(),
            &scenarios,
            session.as_ref(),
        )?);
    }
    Ok(results)
}
