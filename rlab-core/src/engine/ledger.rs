//! Trade ledger: append-only record of closed trades, in closure order.

use crate::domain::TradeRecord;
use serde::{Deserialize, Serialize};

/// Closed trades in the order they were closed.
///
/// With concurrent positions closure order differs from entry order; use
/// [`sorted_by_entry_time`](Self::sorted_by_entry_time) when that matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeLedger {
    trades: Vec<TradeRecord>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.trades.iter()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }

    /// Copy sorted by entry time; ties keep closure order.
    pub fn sorted_by_entry_time(&self) -> Vec<TradeRecord> {
        let mut trades = self.trades.clone();
        trades.sort_by_key(|t| t.entry_time);
        trades
    }

    /// Copy sorted by exit time; ties keep closure order.
    pub fn sorted_by_exit_time(&self) -> Vec<TradeRecord> {
        let mut trades = self.trades.clone();
        trades.sort_by_key(|t| t.exit_time);
        trades
    }

    /// BLAKE3 hex digest of the canonical JSON encoding.
    ///
    /// Two runs produced the same ledger iff their digests match.
    pub fn digest(&self) -> String {
        // Vec<TradeRecord> holds only numbers, enums and timestamps.
        let json = serde_json::to_vec(&self.trades).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

impl IntoIterator for TradeLedger {
    type Item = TradeRecord;
    type IntoIter = std::vec::IntoIter<TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, ExitReason};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(min: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::minutes(min)
    }

    fn trade(entry: i64, exit: i64, r: f64) -> TradeRecord {
        TradeRecord {
            entry_time: at(entry),
            entry_price: 1.0,
            direction: Direction::Long,
            exit_time: at(exit),
            exit_price: 1.0,
            exit_reason: if r > 0.0 {
                ExitReason::TakeProfit
            } else {
                ExitReason::StopLoss
            },
            r_multiple: r,
        }
    }

    #[test]
    fn keeps_closure_order_and_sorts_on_request() {
        let mut ledger = TradeLedger::new();
        ledger.push(trade(5, 6, -1.0));
        ledger.push(trade(1, 8, 2.0));

        assert_eq!(ledger.trades()[0].entry_time, at(5));
        let by_entry = ledger.sorted_by_entry_time();
        assert_eq!(by_entry[0].entry_time, at(1));
        let by_exit = ledger.sorted_by_exit_time();
        assert_eq!(by_exit[0].exit_time, at(6));
    }

    #[test]
    fn digest_tracks_content() {
        let mut a = TradeLedger::new();
        a.push(trade(0, 1, 2.0));
        let mut b = TradeLedger::new();
        b.push(trade(0, 1, 2.0));
        assert_eq!(a.digest(), b.digest());

        b.push(trade(2, 3, -1.0));
        assert_ne!(a.digest(), b.digest());
        assert_ne!(TradeLedger::new().digest(), a.digest());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut ledger = TradeLedger::new();
        ledger.push(trade(0, 1, 0.0));
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["Exit Reason"], "Stop Loss");
    }
}
