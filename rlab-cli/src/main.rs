//! rlab CLI: R-multiple backtests over pre-computed signal tables.
//!
//! Commands:
//! - `run`: sweep every scenario in a TOML config and save artifacts
//! - `simulate`: one scenario straight from a CSV, optional trade export

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rlab_core::domain::Timeframe;
use rlab_runner::{
    build_filtered_signals, export_trades_csv, format_summary_table, load_csv, run_from_config,
    run_scenario, save_artifacts, BacktestConfig, FilterCombo, Scenario,
};

#[derive(Parser)]
#[command(name = "rlab", about = "rlab: R-multiple trade simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for summary, trade tables and result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Simulate a single scenario on a CSV file.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct SimulateArgs {
    /// CSV with timestamp, signal, entry_price, sl_price, high_<tf>, low_<tf>.
    #[arg(long)]
    data: PathBuf,

    /// Execution timeframe label (e.g., 30s, 1min).
    #[arg(long)]
    execution_timeframe: String,

    /// Target in multiples of initial risk.
    #[arg(long, default_value_t = 2.0)]
    rr: f64,

    /// Move the stop to entry once price reaches this many R.
    #[arg(long)]
    breakeven_r: Option<f64>,

    /// Allow concurrent positions.
    #[arg(long, default_value_t = false)]
    allow_multiple: bool,

    /// Optional signal timeframe; entries only on candle starts.
    #[arg(long)]
    signal_timeframe: Option<String>,

    /// Require the `filter_<NAME>` column to be set (repeatable).
    #[arg(long = "filter", value_name = "NAME")]
    filters: Vec<String>,

    /// Write the trade table here.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => run_cmd(config, output_dir),
        Commands::Simulate(args) => simulate_cmd(args),
    }
}

fn run_cmd(config_path: PathBuf, output_dir: PathBuf) -> Result<()> {
    let config = BacktestConfig::from_file(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let results = run_from_config(&config)?;
    print!("{}", format_summary_table(&results));

    let dir = save_artifacts(&output_dir, &results)?;
    println!("Artifacts saved to: {}", dir.display());
    Ok(())
}

fn simulate_cmd(args: SimulateArgs) -> Result<()> {
    let exec_tf: Timeframe = args.execution_timeframe.parse()?;
    let signal_tf = args
        .signal_timeframe
        .as_deref()
        .map(str::parse::<Timeframe>)
        .transpose()?;

    let mut scenario = Scenario::new(args.rr);
    if let Some(trigger) = args.breakeven_r {
        scenario = scenario.with_breakeven(trigger);
    }
    let engine_config = scenario.engine_config(&exec_tf, args.allow_multiple);
    let name = if args.filters.is_empty() {
        scenario.name()
    } else {
        FilterCombo::new(args.filters.clone()).scenario_name(&scenario)
    };

    let series = load_csv(&args.data)?;
    let signals = build_filtered_signals(&series, signal_tf.as_ref(), &args.filters, None)?;
    let result = run_scenario(&series, signals.as_ref(), &name, &engine_config, None)?;

    print!("{}", format_summary_table(std::slice::from_ref(&result)));

    if let Some(path) = args.output {
        std::fs::write(&path, export_trades_csv(&result.trades)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Trades saved to: {}", path.display());
    }
    Ok(())
}
