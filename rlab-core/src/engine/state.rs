//! Mutable engine state: open positions plus the ledger they close into.

use crate::domain::{Position, Signal};
use chrono::{DateTime, Utc};

use super::admission::{self, Admission};
use super::config::EngineConfig;
use super::events::{EngineEvent, EngineObserver};
use super::ledger::TradeLedger;

/// State that evolves bar by bar. Owned by one run, never shared.
#[derive(Debug, Default)]
pub struct EngineState {
    /// Open positions in insertion order.
    open: Vec<Position>,
    ledger: TradeLedger,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_positions(&self) -> &[Position] {
        &self.open
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> TradeLedger {
        self.ledger
    }

    /// Phase 1: breakeven then exit check for every open position.
    ///
    /// `retain_mut` visits each position exactly once in insertion order and
    /// drops the ones that exit, so closures inside the pass cannot skip or
    /// repeat a neighbour.
    pub fn resolve_exits(
        &mut self,
        time: DateTime<Utc>,
        high: f64,
        low: f64,
        use_breakeven: bool,
        observer: &mut dyn EngineObserver,
    ) {
        let ledger = &mut self.ledger;
        self.open.retain_mut(|pos| {
            if use_breakeven && pos.arm_breakeven(high, low) {
                observer.on_event(&EngineEvent::BreakevenArmed {
                    time,
                    entry_time: pos.entry_time(),
                    direction: pos.direction(),
                });
            }

            let Some(reason) = pos.exit_on(high, low) else {
                return true;
            };
            let trade = pos.trade_record(reason, time);
            observer.on_event(&EngineEvent::PositionClosed {
                time,
                entry_time: trade.entry_time,
                direction: trade.direction,
                reason,
                r_multiple: trade.r_multiple,
            });
            ledger.push(trade);
            false
        });
    }

    /// Phase 2: admit `signal` if a slot is free and its prices are valid.
    ///
    /// Returns true if a position was opened.
    pub fn consider_entry(
        &mut self,
        time: DateTime<Utc>,
        signal: &Signal,
        config: &EngineConfig,
        observer: &mut dyn EngineObserver,
    ) -> bool {
        match admission::evaluate(self.open.len(), config.allow_multiple_trades, signal) {
            Admission::SlotOccupied => {
                observer.on_event(&EngineEvent::SignalSkipped {
                    time,
                    direction: signal.direction,
                });
                false
            }
            Admission::Rejected(reason) => {
                observer.on_event(&EngineEvent::SignalRejected {
                    time,
                    direction: signal.direction,
                    reason,
                });
                false
            }
            Admission::Admitted(entry) => {
                let pos = Position::open(
                    entry.direction,
                    time,
                    entry.entry_price,
                    entry.stop_price,
                    config.risk_reward_ratio,
                    config.breakeven_trigger_r,
                );
                observer.on_event(&EngineEvent::PositionOpened {
                    time,
                    direction: pos.direction(),
                    entry_price: pos.entry_price(),
                    stop_loss: pos.stop_loss(),
                    take_profit: pos.take_profit(),
                });
                self.open.push(pos);
                true
            }
        }
    }
}
