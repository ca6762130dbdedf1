//! Entry admission: may this signal open a position on this bar?
//!
//! Pure functions over the open-position count, the run's multiple-trade
//! flag and the signal itself. Evaluated every bar after exits, so a slot
//! freed on a bar can be reused by a signal on that same bar.

use crate::domain::{Direction, Signal};
use serde::{Deserialize, Serialize};

/// Why an otherwise admissible signal was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    MissingEntryPrice,
    MissingStopPrice,
    /// Entry equals stop: there is no risk unit to measure R against.
    ZeroRisk,
}

/// A signal that passed validation: finite prices, non-zero risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedEntry {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
}

impl ValidatedEntry {
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.stop_price).abs()
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    Admitted(ValidatedEntry),
    /// Single-position mode and a position is already open.
    SlotOccupied,
    Rejected(Rejection),
}

/// True if a new position may be opened given the current open count.
pub fn slot_available(open_count: usize, allow_multiple_trades: bool) -> bool {
    allow_multiple_trades || open_count == 0
}

/// Check a signal's prices. Non-finite prices count as missing.
pub fn validate_signal(signal: &Signal) -> Result<ValidatedEntry, Rejection> {
    let entry_price = signal
        .entry_price
        .filter(|p| p.is_finite())
        .ok_or(Rejection::MissingEntryPrice)?;
    let stop_price = signal
        .stop_price
        .filter(|p| p.is_finite())
        .ok_or(Rejection::MissingStopPrice)?;
    if (entry_price - stop_price).abs() == 0.0 {
        return Err(Rejection::ZeroRisk);
    }
    Ok(ValidatedEntry {
        direction: signal.direction,
        entry_price,
        stop_price,
    })
}

/// Slot check first, then signal validation.
pub fn evaluate(open_count: usize, allow_multiple_trades: bool, signal: &Signal) -> Admission {
    if !slot_available(open_count, allow_multiple_trades) {
        return Admission::SlotOccupied;
    }
    match validate_signal(signal) {
        Ok(entry) => Admission::Admitted(entry),
        Err(reason) => Admission::Rejected(reason),
    }
}
