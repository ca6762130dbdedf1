//! Engine events and observers.
//!
//! The loop reports what it does through [`EngineObserver`]. Observers only
//! watch; nothing they do feeds back into the simulation.

use crate::domain::{Direction, ExitReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::admission::Rejection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    PositionOpened {
        time: DateTime<Utc>,
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    },
    BreakevenArmed {
        time: DateTime<Utc>,
        entry_time: DateTime<Utc>,
        direction: Direction,
    },
    PositionClosed {
        time: DateTime<Utc>,
        entry_time: DateTime<Utc>,
        direction: Direction,
        reason: ExitReason,
        r_multiple: f64,
    },
    SignalRejected {
        time: DateTime<Utc>,
        direction: Direction,
        reason: Rejection,
    },
    /// Single-position mode ignored a signal because a position was open.
    SignalSkipped {
        time: DateTime<Utc>,
        direction: Direction,
    },
    RunCompleted {
        rows: usize,
        trades: usize,
        still_open: usize,
    },
}

pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl EngineObserver for NullObserver {
    fn on_event(&mut self, _event: &EngineEvent) {}
}

/// Forwards events to the `log` facade: lifecycle at debug, the summary at info.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl EngineObserver for LogObserver {
    fn on_event(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::PositionOpened {
                time,
                direction,
                entry_price,
                stop_loss,
                take_profit,
            } => log::debug!(
                "{time} open {direction} @ {entry_price} sl={stop_loss} tp={take_profit}"
            ),
            EngineEvent::BreakevenArmed {
                time,
                entry_time,
                direction,
            } => log::debug!("{time} breakeven armed for {direction} entered {entry_time}"),
            EngineEvent::PositionClosed {
                time,
                entry_time,
                direction,
                reason,
                r_multiple,
            } => log::debug!(
                "{time} close {direction} entered {entry_time}: {reason} ({r_multiple}R)"
            ),
            EngineEvent::SignalRejected {
                time,
                direction,
                reason,
            } => log::debug!("{time} {direction} signal rejected: {reason:?}"),
            EngineEvent::SignalSkipped { time, direction } => {
                log::trace!("{time} {direction} signal skipped, position open")
            }
            EngineEvent::RunCompleted {
                rows,
                trades,
                still_open,
            } => log::info!(
                "backtest complete: {trades} trades from {rows} rows ({still_open} left open)"
            ),
        }
    }
}

/// Keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<EngineEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}
