//! Engine configuration for a single simulation run.

use crate::domain::Timeframe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("risk_reward_ratio must be a positive finite number, got {0}")]
    InvalidRiskReward(f64),

    #[error("breakeven_trigger_r must be a finite number >= 0 when breakeven is enabled, got {0}")]
    InvalidBreakevenTrigger(f64),
}

fn default_breakeven_trigger_r() -> f64 {
    1.0
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Take-profit distance in multiples of the initial risk.
    pub risk_reward_ratio: f64,
    /// Move the stop to entry once price reaches `breakeven_trigger_r`.
    #[serde(default)]
    pub use_breakeven: bool,
    /// Favorable excursion, in R, that arms breakeven. Ignored unless `use_breakeven`.
    #[serde(default = "default_breakeven_trigger_r")]
    pub breakeven_trigger_r: f64,
    /// Timeframe whose `high_<tf>` / `low_<tf>` columns decide exits.
    pub execution_timeframe: Timeframe,
    /// If false, no entry is admitted while a position is open.
    #[serde(default)]
    pub allow_multiple_trades: bool,
}

impl EngineConfig {
    /// Single-position config without breakeven.
    pub fn new(risk_reward_ratio: f64, execution_timeframe: Timeframe) -> Self {
        Self {
            risk_reward_ratio,
            use_breakeven: false,
            breakeven_trigger_r: default_breakeven_trigger_r(),
            execution_timeframe,
            allow_multiple_trades: false,
        }
    }

    pub fn with_breakeven(mut self, trigger_r: f64) -> Self {
        self.use_breakeven = true;
        self.breakeven_trigger_r = trigger_r;
        self
    }

    pub fn with_multiple_trades(mut self, allow: bool) -> Self {
        self.allow_multiple_trades = allow;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_reward_ratio.is_finite() && self.risk_reward_ratio > 0.0) {
            return Err(ConfigError::InvalidRiskReward(self.risk_reward_ratio));
        }
        if self.use_breakeven
            && !(self.breakeven_trigger_r.is_finite() && self.breakeven_trigger_r >= 0.0)
        {
            return Err(ConfigError::InvalidBreakevenTrigger(
                self.breakeven_trigger_r,
            ));
        }
        Ok(())
    }
}
