//! TradeRecord: a completed round trip, measured in R.

use super::signal::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    #[serde(rename = "Stop Loss")]
    StopLoss,
    #[serde(rename = "Take Profit")]
    TakeProfit,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StopLoss => "Stop Loss",
            Self::TakeProfit => "Take Profit",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One closed trade.
///
/// Field names serialize to the trade-table headers (`Entry Time`,
/// `R-Multiple`, ...) so CSV and JSON exports share one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Entry Time")]
    pub entry_time: DateTime<Utc>,
    #[serde(rename = "Entry Price")]
    pub entry_price: f64,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "Exit Time")]
    pub exit_time: DateTime<Utc>,
    #[serde(rename = "Exit Price")]
    pub exit_price: f64,
    #[serde(rename = "Exit Reason")]
    pub exit_reason: ExitReason,
    #[serde(rename = "R-Multiple")]
    pub r_multiple: f64,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.r_multiple > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.r_multiple < 0.0
    }

    pub fn is_breakeven(&self) -> bool {
        self.r_multiple == 0.0
    }
}
