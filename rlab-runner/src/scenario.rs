//! One risk/reward variant of a run, and the filter subsets it is crossed with.

use rlab_core::domain::Timeframe;
use rlab_core::engine::EngineConfig;
use serde::{Deserialize, Serialize};

fn default_trigger_r() -> f64 {
    1.0
}

/// A `[[scenarios]]` entry: target R plus optional breakeven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub risk_reward_ratio: f64,
    #[serde(default)]
    pub use_breakeven: bool,
    #[serde(default = "default_trigger_r")]
    pub breakeven_trigger_r: f64,
}

impl Scenario {
    pub fn new(risk_reward_ratio: f64) -> Self {
        Self {
            risk_reward_ratio,
            use_breakeven: false,
            breakeven_trigger_r: default_trigger_r(),
        }
    }

    pub fn with_breakeven(mut self, trigger_r: f64) -> Self {
        self.use_breakeven = true;
        self.breakeven_trigger_r = trigger_r;
        self
    }

    /// Display name, e.g. `2.0R` or `2.0R_BE`.
    pub fn name(&self) -> String {
        let mut name = format!("{:.1}R", self.risk_reward_ratio);
        if self.use_breakeven {
            name.push_str("_BE");
        }
        name
    }

    pub fn engine_config(
        &self,
        execution_timeframe: &Timeframe,
        allow_multiple_trades: bool,
    ) -> EngineConfig {
        let cfg = EngineConfig::new(self.risk_reward_ratio, execution_timeframe.clone())
            .with_multiple_trades(allow_multiple_trades);
        if self.use_breakeven {
            cfg.with_breakeven(self.breakeven_trigger_r)
        } else {
            cfg
        }
    }
}

/// One subset of the configured filters. A run sweeps every subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCombo(Vec<String>);

impl FilterCombo {
    pub fn new(filters: Vec<String>) -> Self {
        Self(filters)
    }

    /// Every subset of `filters`, smallest first. Subsets of one size keep the
    /// configured order: `[]`, `[A]`, `[B]`, `[A, B]`.
    pub fn all(filters: &[String]) -> Vec<FilterCombo> {
        let mut out = Vec::new();
        for size in 0..=filters.len() {
            push_subsets(filters, size, 0, &mut Vec::new(), &mut out);
        }
        out
    }

    pub fn filters(&self) -> &[String] {
        &self.0
    }

    /// `Base` for the empty subset, otherwise the names joined by `+`.
    pub fn name(&self) -> String {
        if self.0.is_empty() {
            "Base".to_string()
        } else {
            self.0.join("+")
        }
    }

    /// Scenario name prefixed with this subset, e.g. `Volume+Body_2.0R_BE`.
    pub fn scenario_name(&self, scenario: &Scenario) -> String {
        format!("{}_{}", self.name(), scenario.name())
    }
}

fn push_subsets(
    filters: &[String],
    size: usize,
    start: usize,
    current: &mut Vec<String>,
    out: &mut Vec<FilterCombo>,
) {
    if current.len() == size {
        out.push(FilterCombo(current.clone()));
        return;
    }
    for (i, filter) in filters.iter().enumerate().skip(start) {
        current.push(filter.clone());
        push_subsets(filters, size, i + 1, current, out);
        current.pop();
    }
}
