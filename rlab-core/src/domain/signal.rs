//! Direction and Signal: what a signal source hands to the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction. Serialized as `LONG` / `SHORT` to match the trade table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Map a signal column value: `1` is long, `-1` is short, anything else is none.
    pub fn from_signal_value(value: f64) -> Option<Self> {
        if value == 1.0 {
            Some(Self::Long)
        } else if value == -1.0 {
            Some(Self::Short)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate entry produced by a signal source for one row.
///
/// Prices are optional because upstream detectors routinely leave them
/// blank; a `None` or non-finite price makes the signal invalid at admission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub direction: Direction,
    pub entry_price: Option<f64>,
    pub stop_price: Option<f64>,
}

impl Signal {
    pub fn new(direction: Direction, entry_price: f64, stop_price: f64) -> Self {
        Self {
            direction,
            entry_price: Some(entry_price),
            stop_price: Some(stop_price),
        }
    }

    pub fn long(entry_price: f64, stop_price: f64) -> Self {
        Self::new(Direction::Long, entry_price, stop_price)
    }

    pub fn short(entry_price: f64, stop_price: f64) -> Self {
        Self::new(Direction::Short, entry_price, stop_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_value_mapping() {
        assert_eq!(Direction::from_signal_value(1.0), Some(Direction::Long));
        assert_eq!(Direction::from_signal_value(-1.0), Some(Direction::Short));
        assert_eq!(Direction::from_signal_value(0.0), None);
        assert_eq!(Direction::from_signal_value(f64::NAN), None);
    }

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"LONG\"");
        let d: Direction = serde_json::from_str("\"SHORT\"").unwrap();
        assert_eq!(d, Direction::Short);
    }
}
