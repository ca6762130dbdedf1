//! R-multiple statistics: pure functions over a trade list.
//!
//! No dependencies on the runner, data pipeline, or engine. Trades are taken
//! in the order given (ledger order) for streaks; grouping uses UTC entry time.

use std::collections::BTreeMap;

use chrono::Datelike;
use rlab_core::domain::TradeRecord;
use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Whole-run statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    /// `wins / (wins + losses) * 100`; break-evens are excluded.
    pub win_rate: f64,
    pub total_r: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

/// Statistics for one month or one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub label: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub total_r: f64,
}

/// Overall, monthly and day-of-week breakdowns for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RReport {
    pub overall: RStats,
    pub monthly: Vec<GroupStats>,
    pub by_weekday: Vec<GroupStats>,
}

impl RReport {
    /// `None` when there are no trades.
    pub fn compute(trades: &[TradeRecord]) -> Option<Self> {
        Some(Self {
            overall: RStats::compute(trades)?,
            monthly: monthly_stats(trades),
            by_weekday: weekday_stats(trades),
        })
    }
}

impl RStats {
    /// `None` when there are no trades.
    pub fn compute(trades: &[TradeRecord]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }
        let tally = Tally::of(trades.iter());
        Some(Self {
            total_trades: tally.trades,
            wins: tally.wins,
            losses: tally.losses,
            breakevens: tally.breakevens,
            win_rate: win_rate(tally.wins, tally.losses),
            total_r: tally.total_r,
            max_consecutive_wins: max_consecutive(trades, TradeRecord::is_winner),
            max_consecutive_losses: max_consecutive(trades, TradeRecord::is_loser),
        })
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Percentage of deciding trades that won. 0.0 with no deciding trades.
pub fn win_rate(wins: usize, losses: usize) -> f64 {
    let deciding = wins + losses;
    if deciding == 0 {
        return 0.0;
    }
    wins as f64 / deciding as f64 * 100.0
}

/// Longest run of consecutive trades matching `pred`. Any other trade,
/// including a break-even, ends the run.
pub fn max_consecutive(trades: &[TradeRecord], pred: fn(&TradeRecord) -> bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for t in trades {
        if pred(t) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Per-month stats keyed `YYYY-MM`, chronological.
pub fn monthly_stats(trades: &[TradeRecord]) -> Vec<GroupStats> {
    let mut groups: BTreeMap<(i32, u32), Vec<&TradeRecord>> = BTreeMap::new();
    for t in trades {
        groups
            .entry((t.entry_time.year(), t.entry_time.month()))
            .or_default()
            .push(t);
    }
    groups
        .into_iter()
        .map(|((y, m), group)| Tally::of(group.into_iter()).into_group(format!("{y:04}-{m:02}")))
        .collect()
}

/// Per-weekday stats, Monday first, only days that have trades.
pub fn weekday_stats(trades: &[TradeRecord]) -> Vec<GroupStats> {
    let mut groups: BTreeMap<u32, Vec<&TradeRecord>> = BTreeMap::new();
    for t in trades {
        groups
            .entry(t.entry_time.weekday().num_days_from_monday())
            .or_default()
            .push(t);
    }
    groups
        .into_iter()
        .map(|(d, group)| Tally::of(group.into_iter()).into_group(WEEKDAYS[d as usize].to_string()))
        .collect()
}

#[derive(Default)]
struct Tally {
    trades: usize,
    wins: usize,
    losses: usize,
    breakevens: usize,
    total_r: f64,
}

impl Tally {
    fn of<'a>(trades: impl Iterator<Item = &'a TradeRecord>) -> Self {
        let mut t = Self::default();
        for trade in trades {
            t.trades += 1;
            t.total_r += trade.r_multiple;
            if trade.is_winner() {
                t.wins += 1;
            } else if trade.is_loser() {
                t.losses += 1;
            } else if trade.is_breakeven() {
                t.breakevens += 1;
            }
        }
        t
    }

    fn into_group(self, label: String) -> GroupStats {
        GroupStats {
            label,
            trades: self.trades,
            wins: self.wins,
            losses: self.losses,
            breakevens: self.breakevens,
            win_rate: win_rate(self.wins, self.losses),
            total_r: self.total_r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use rlab_core::domain::{Direction, ExitReason};

    fn trade(entry: DateTime<Utc>, r: f64) -> TradeRecord {
        let reason = if r > 0.0 {
            ExitReason::TakeProfit
        } else {
            ExitReason::StopLoss
        };
        TradeRecord {
            entry_time: entry,
            entry_price: 100.0,
            direction: Direction::Long,
            exit_time: entry + chrono::Duration::minutes(5),
            exit_price: 100.0 + r,
            exit_reason: reason,
            r_multiple: r,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_has_no_report() {
        assert!(RStats::compute(&[]).is_none());
        assert!(RReport::compute(&[]).is_none());
    }

    #[test]
    fn overall_counts_and_win_rate() {
        let trades = vec![
            trade(day(2024, 1, 1), 2.0),
            trade(day(2024, 1, 2), -1.0),
            trade(day(2024, 1, 3), 0.0),
            trade(day(2024, 1, 4), 2.0),
        ];
        let s = RStats::compute(&trades).unwrap();
        assert_eq!(s.total_trades, 4);
        assert_eq!((s.wins, s.losses, s.breakevens), (2, 1, 1));
        assert!((s.win_rate - 66.666_666).abs() < 1e-3);
        assert_eq!(s.total_r, 3.0);
    }

    #[test]
    fn break_even_ends_both_streaks() {
        let trades: Vec<_> = [2.0, 2.0, 0.0, 2.0, -1.0, -1.0, 0.0, -1.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| trade(day(2024, 1, 1 + i as u32), r))
            .collect();
        let s = RStats::compute(&trades).unwrap();
        assert_eq!(s.max_consecutive_wins, 2);
        assert_eq!(s.max_consecutive_losses, 2);
    }

    #[test]
    fn no_deciding_trades_gives_zero_win_rate() {
        let s = RStats::compute(&[trade(day(2024, 1, 1), 0.0)]).unwrap();
        assert_eq!(s.win_rate, 0.0);
        assert_eq!(s.breakevens, 1);
    }

    #[test]
    fn monthly_groups_are_chronological() {
        let trades = vec![
            trade(day(2024, 3, 5), 2.0),
            trade(day(2023, 12, 29), -1.0),
            trade(day(2024, 3, 6), -1.0),
        ];
        let months = monthly_stats(&trades);
        let labels: Vec<_> = months.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["2023-12", "2024-03"]);
        assert_eq!(months[1].trades, 2);
        assert_eq!(months[1].total_r, 1.0);
        assert_eq!(months[1].win_rate, 50.0);
    }

    #[test]
    fn weekday_groups_start_monday_and_skip_empty_days() {
        // 2024-01-01 is a Monday.
        let trades = vec![
            trade(day(2024, 1, 5), 2.0), // Friday
            trade(day(2024, 1, 1), -1.0),
            trade(day(2024, 1, 8), 2.0), // Monday
        ];
        let days = weekday_stats(&trades);
        let labels: Vec<_> = days.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["Monday", "Friday"]);
        assert_eq!(days[0].trades, 2);
        assert_eq!(days[0].total_r, 1.0);
    }

    proptest! {
        #[test]
        fn counts_partition_the_trades(rs in prop::collection::vec(prop_oneof![Just(-1.0), Just(0.0), Just(2.0)], 1..60)) {
            let trades: Vec<_> = rs
                .iter()
                .enumerate()
                .map(|(i, &r)| trade(day(2024, 1, 1) + chrono::Duration::hours(7 * i as i64), r))
                .collect();
            let s = RStats::compute(&trades).unwrap();
            prop_assert_eq!(s.wins + s.losses + s.breakevens, s.total_trades);
            prop_assert!(s.max_consecutive_wins <= s.wins);
            prop_assert!(s.max_consecutive_losses <= s.losses);

            let monthly: usize = monthly_stats(&trades).iter().map(|g| g.trades).sum();
            let weekly: usize = weekday_stats(&trades).iter().map(|g| g.trades).sum();
            prop_assert_eq!(monthly, s.total_trades);
            prop_assert_eq!(weekly, s.total_trades);
        }
    }
}
