//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for scenario results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade table per scenario plus a one-row-per-scenario summary
//! - **Markdown**: overall, monthly and day-of-week breakdowns
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::SecondsFormat;
use rlab_core::domain::TradeRecord;

use crate::metrics::GroupStats;
use crate::runner::{ScenarioResult, SCHEMA_VERSION};

/// Trade table header, matching the `TradeRecord` serde names.
pub const TRADE_COLUMNS: [&str; 7] = [
    "Entry Time",
    "Entry Price",
    "Direction",
    "Exit Time",
    "Exit Price",
    "Exit Reason",
    "R-Multiple",
];

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScenarioResult` to pretty JSON.
pub fn export_json(result: &ScenarioResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ScenarioResult to JSON")
}

/// Deserialize a `ScenarioResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScenarioResult> {
    let result: ScenarioResult =
        serde_json::from_str(json).context("failed to deserialize ScenarioResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a trade list as CSV. An empty list yields the header only.
///
/// Columns: Entry Time, Entry Price, Direction, Exit Time, Exit Price,
/// Exit Reason, R-Multiple. Times are RFC 3339 UTC.
pub fn export_trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(TRADE_COLUMNS)?;

    for t in trades {
        wtr.write_record([
            t.entry_time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            t.entry_price.to_string(),
            t.direction.as_str().to_string(),
            t.exit_time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            t.exit_price.to_string(),
            t.exit_reason.as_str().to_string(),
            t.r_multiple.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// One row per scenario: scenario, trades, wins, losses, breakevens, win_rate, total_r.
///
/// Scenarios with no trades report zeros.
pub fn export_summary_csv(results: &[ScenarioResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "scenario",
        "trades",
        "wins",
        "losses",
        "breakevens",
        "win_rate",
        "total_r",
    ])?;

    for r in results {
        let row = match r.overall() {
            Some(s) => [
                r.name.clone(),
                s.total_trades.to_string(),
                s.wins.to_string(),
                s.losses.to_string(),
                s.breakevens.to_string(),
                format!("{:.2}", s.win_rate),
                format!("{:.2}", s.total_r),
            ],
            None => [
                r.name.clone(),
                "0".into(),
                "0".into(),
                "0".into(),
                "0".into(),
                "0.00".into(),
                "0.00".into(),
            ],
        };
        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

// ─── Artifact directory ─────────────────────────────────────────────

/// Save the full artifact set for a sweep to `output_dir`:
/// - `summary.csv`: one row per scenario
/// - `<scenario>.trades.csv`: trade table
/// - `<scenario>.json`: full result, re-loadable with [`load_result`]
/// - `<scenario>.md`: statistics report
///
/// Returns the directory.
pub fn save_artifacts(output_dir: &Path, results: &[ScenarioResult]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let summary = export_summary_csv(results)?;
    std::fs::write(output_dir.join("summary.csv"), summary)?;

    for r in results {
        let trades_path = output_dir.join(format!("{}.trades.csv", r.name));
        std::fs::write(&trades_path, export_trades_csv(&r.trades)?)
            .with_context(|| format!("failed to write {}", trades_path.display()))?;

        std::fs::write(output_dir.join(format!("{}.json", r.name)), export_json(r)?)?;
        std::fs::write(output_dir.join(format!("{}.md", r.name)), generate_report(r))?;
    }

    log::info!(
        "wrote {} scenario artifacts to {}",
        results.len(),
        output_dir.display()
    );
    Ok(output_dir.to_path_buf())
}

/// Load a `ScenarioResult` from a `<scenario>.json` artifact.
///
/// Rejects unknown schema versions.
pub fn load_result(path: &Path) -> Result<ScenarioResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Text reports ───────────────────────────────────────────────────

/// Fixed-width summary table, one line per scenario.
pub fn format_summary_table(results: &[ScenarioResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>7} {:>6} {:>6} {:>6} {:>9} {:>10}\n",
        "Scenario", "Trades", "Wins", "Losses", "BE", "Win Rate", "Total R"
    ));
    out.push_str(&"-".repeat(62));
    out.push('\n');
    for r in results {
        match r.overall() {
            Some(s) => out.push_str(&format!(
                "{:<12} {:>7} {:>6} {:>6} {:>6} {:>8.2}% {:>9.2}R\n",
                r.name, s.total_trades, s.wins, s.losses, s.breakevens, s.win_rate, s.total_r
            )),
            None => out.push_str(&format!("{:<12} {:>7}\n", r.name, "no trades")),
        }
    }
    out
}

/// Markdown report for one scenario.
pub fn generate_report(result: &ScenarioResult) -> String {
    let mut md = String::with_capacity(2048);
    md.push_str(&format!("# Scenario {}\n\n", result.name));

    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Execution Timeframe | {} |\n",
        result.config.execution_timeframe
    ));
    md.push_str(&format!(
        "| Risk/Reward | {:.2} |\n",
        result.config.risk_reward_ratio
    ));
    if result.config.use_breakeven {
        md.push_str(&format!(
            "| Breakeven Trigger | {:.2}R |\n",
            result.config.breakeven_trigger_r
        ));
    }
    md.push_str(&format!(
        "| Multiple Trades | {} |\n",
        result.config.allow_multiple_trades
    ));
    md.push_str(&format!(
        "| Candidate Trades | {} |\n",
        result.candidate_count
    ));
    md.push_str(&format!("| Ledger Digest | {} |\n\n", result.ledger_digest));

    let Some(report) = &result.report else {
        md.push_str("No trades to analyze.\n");
        return md;
    };

    let s = &report.overall;
    md.push_str("## Overall\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Total Trades | {} |\n", s.total_trades));
    md.push_str(&format!("| Winners | {} |\n", s.wins));
    md.push_str(&format!("| Losers | {} |\n", s.losses));
    md.push_str(&format!("| Break-Evens | {} |\n", s.breakevens));
    md.push_str(&format!("| Win Rate (W/(W+L)) | {:.2}% |\n", s.win_rate));
    md.push_str(&format!("| Total R | {:.2}R |\n", s.total_r));
    md.push_str(&format!(
        "| Max Consecutive Wins | {} |\n",
        s.max_consecutive_wins
    ));
    md.push_str(&format!(
        "| Max Consecutive Losses | {} |\n\n",
        s.max_consecutive_losses
    ));

    md.push_str("## Monthly\n\n");
    md.push_str(&group_table("Month", &report.monthly));
    md.push_str("\n## Day of Week\n\n");
    md.push_str(&group_table("Day", &report.by_weekday));
    md
}

fn group_table(key: &str, groups: &[GroupStats]) -> String {
    let mut md = format!("| {key} | Trades | W | L | BE | Win Rate | R |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
    for g in groups {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:.2}% | {:.2}R |\n",
            g.label, g.trades, g.wins, g.losses, g.breakevens, g.win_rate, g.total_r
        ));
    }
    md
}
