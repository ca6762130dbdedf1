//! rlab runner: scenario orchestration on top of `rlab-core`.
//!
//! This crate provides:
//! - TOML run configuration with validated scenarios
//! - CSV loading into a price series
//! - Parallel scenario sweep with deterministic result order, crossed with
//!   every subset of the configured signal filters
//! - Session-window filtering of trades by entry time
//! - R-multiple statistics (overall, monthly, day of week)
//! - CSV/JSON/Markdown export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod scenario;
pub mod session;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{load_csv, read_series, LoadError};
pub use export::{
    export_json, export_summary_csv, export_trades_csv, format_summary_table, generate_report,
    import_json, load_result, save_artifacts,
};
pub use metrics::{GroupStats, RReport, RStats};
pub use runner::{
    build_filtered_signals, build_signals, run_from_config, run_scenario, run_scenarios,
    RunError, ScenarioResult, SCHEMA_VERSION,
};
pub use scenario::{FilterCombo, Scenario};
pub use session::SessionWindow;
