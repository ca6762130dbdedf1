//! Position: an open simulated trade with fixed stop, target and breakeven level.
//!
//! Fields are private so the stop can only move through
//! [`Position::arm_breakeven`], which happens at most once.

use super::signal::Direction;
use super::trade::{ExitReason, TradeRecord};
use chrono::{DateTime, Utc};

/// R booked by a stop-loss exit before breakeven was armed.
pub const LOSS_R: f64 = -1.0;
/// R booked by a stop-loss exit after breakeven was armed.
pub const BREAKEVEN_R: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    direction: Direction,
    entry_time: DateTime<Utc>,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    breakeven_price: f64,
    breakeven_triggered: bool,
    target_r: f64,
}

impl Position {
    /// Open a position one risk unit (`|entry - stop|`) away from its stop.
    ///
    /// The target sits `target_r` units beyond entry and the breakeven level
    /// `breakeven_r` units beyond entry, both on the favorable side. Callers
    /// must have rejected zero-risk and non-finite inputs beforehand.
    pub fn open(
        direction: Direction,
        entry_time: DateTime<Utc>,
        entry_price: f64,
        stop_loss: f64,
        target_r: f64,
        breakeven_r: f64,
    ) -> Self {
        let risk = (entry_price - stop_loss).abs();
        let (take_profit, breakeven_price) = match direction {
            Direction::Long => (entry_price + risk * target_r, entry_price + risk * breakeven_r),
            Direction::Short => (entry_price - risk * target_r, entry_price - risk * breakeven_r),
        };
        Self {
            direction,
            entry_time,
            entry_price,
            stop_loss,
            take_profit,
            breakeven_price,
            breakeven_triggered: false,
            target_r,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn take_profit(&self) -> f64 {
        self.take_profit
    }

    pub fn breakeven_price(&self) -> f64 {
        self.breakeven_price
    }

    pub fn breakeven_triggered(&self) -> bool {
        self.breakeven_triggered
    }

    /// Move the stop to entry if this bar reached the breakeven level.
    ///
    /// Returns true only on the bar that arms it. NaN prices never arm.
    pub fn arm_breakeven(&mut self, high: f64, low: f64) -> bool {
        if self.breakeven_triggered {
            return false;
        }
        let reached = match self.direction {
            Direction::Long => high >= self.breakeven_price,
            Direction::Short => low <= self.breakeven_price,
        };
        if reached {
            self.stop_loss = self.entry_price;
            self.breakeven_triggered = true;
        }
        reached
    }

    /// Exit triggered by this bar's range, stop-loss first.
    ///
    /// When both levels fall inside the range the stop wins: the intrabar
    /// path is unknown, so the adverse outcome is assumed.
    pub fn exit_on(&self, high: f64, low: f64) -> Option<ExitReason> {
        let (stop_hit, target_hit) = match self.direction {
            Direction::Long => (low <= self.stop_loss, high >= self.take_profit),
            Direction::Short => (high >= self.stop_loss, low <= self.take_profit),
        };
        if stop_hit {
            Some(ExitReason::StopLoss)
        } else if target_hit {
            Some(ExitReason::TakeProfit)
        } else {
            None
        }
    }

    pub fn exit_price(&self, reason: ExitReason) -> f64 {
        match reason {
            ExitReason::StopLoss => self.stop_loss,
            ExitReason::TakeProfit => self.take_profit,
        }
    }

    pub fn r_multiple(&self, reason: ExitReason) -> f64 {
        match reason {
            ExitReason::StopLoss if self.breakeven_triggered => BREAKEVEN_R,
            ExitReason::StopLoss => LOSS_R,
            ExitReason::TakeProfit => self.target_r,
        }
    }

    /// The record this position would produce if it exited now.
    pub fn trade_record(&self, reason: ExitReason, exit_time: DateTime<Utc>) -> TradeRecord {
        TradeRecord {
            entry_time: self.entry_time,
            entry_price: self.entry_price,
            direction: self.direction,
            exit_time,
            exit_price: self.exit_price(reason),
            exit_reason: reason,
            r_multiple: self.r_multiple(reason),
        }
    }
}
