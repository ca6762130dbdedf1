//! Trading-session filter applied to trades after a run.
//!
//! The window is a pair of local wall-clock times in a named timezone. When
//! `start > end` the window wraps midnight (e.g. 22:00 to 07:00).

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use rlab_core::domain::TradeRecord;

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionWindow {
    start: NaiveTime,
    end: NaiveTime,
    timezone: Tz,
}

impl SessionWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, timezone: Tz) -> Self {
        Self {
            start,
            end,
            timezone,
        }
    }

    /// Parse `HH:MM` (or `HH:MM:SS`) bounds.
    pub fn parse(start: &str, end: &str, timezone: Tz) -> Result<Self, ConfigError> {
        Ok(Self::new(
            parse_session_time(start)?,
            parse_session_time(end)?,
            timezone,
        ))
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Inclusive at both ends.
    pub fn contains_local(&self, time: NaiveTime) -> bool {
        if self.wraps_midnight() {
            time >= self.start || time <= self.end
        } else {
            self.start <= time && time <= self.end
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.contains_local(instant.with_timezone(&self.timezone).time())
    }

    /// Trades whose entry time falls inside the window, in ledger order.
    pub fn filter_trades(&self, trades: &[TradeRecord]) -> Vec<TradeRecord> {
        trades
            .iter()
            .filter(|t| self.contains(t.entry_time))
            .cloned()
            .collect()
    }
}

pub fn parse_session_time(value: &str) -> Result<NaiveTime, ConfigError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ConfigError::BadSessionTime(value.to_string()))
}
