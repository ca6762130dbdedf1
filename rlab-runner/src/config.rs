//! TOML run configuration.
//!
//! One file describes the data source, the engine settings shared by every
//! scenario, an optional signal timeframe and session window, and the list of
//! risk/reward scenarios to sweep.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rlab_core::domain::Timeframe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::Scenario;
use crate::session::SessionWindow;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config defines no [[scenarios]]")]
    NoScenarios,

    #[error("scenario {index} ({name}): {source}")]
    InvalidScenario {
        index: usize,
        name: String,
        #[source]
        source: rlab_core::engine::ConfigError,
    },

    #[error("start_date {start} is after end_date {end}")]
    BadDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("invalid session time '{0}', expected HH:MM")]
    BadSessionTime(String),

    #[error("two scenarios are both named '{0}'; their artifacts would collide")]
    DuplicateScenario(String),

    #[error("filter '{0}' is listed more than once")]
    DuplicateFilter(String),
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub data: DataConfig,
    pub engine: EngineSection,
    #[serde(default)]
    pub signals: SignalsConfig,
    #[serde(default)]
    pub session: Option<SessionConfig>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// CSV file. Relative paths are resolved against the config file's directory.
    pub path: PathBuf,
    /// Inclusive, in `timezone`.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive, in `timezone`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// IANA name used for the date range and the session window.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Engine settings shared by every scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSection {
    pub execution_timeframe: Timeframe,
    #[serde(default)]
    pub allow_multiple_trades: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SignalsConfig {
    /// When set, entries are only taken on the first row of each candle of
    /// this timeframe (requires an `open_<tf>` column).
    #[serde(default)]
    pub signal_timeframe: Option<Timeframe>,
    /// Names of `filter_<name>` mask columns. Every subset is swept and the
    /// subset name prefixes the scenario name.
    #[serde(default)]
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    pub start: String,
    pub end: String,
}

impl BacktestConfig {
    /// Parse a config from a TOML string. Does not validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a config file, resolving a relative data path against
    /// the file's directory. Does not validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if config.data.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data.path = dir.join(&config.data.path);
            }
        }
        Ok(config)
    }

    /// Check everything that can be checked without loading data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        let mut names = HashSet::new();
        for (index, scenario) in self.scenarios.iter().enumerate() {
            if !names.insert(scenario.name()) {
                return Err(ConfigError::DuplicateScenario(scenario.name()));
            }
            scenario
                .engine_config(&self.engine.execution_timeframe, false)
                .validate()
                .map_err(|source| ConfigError::InvalidScenario {
                    index,
                    name: scenario.name(),
                    source,
                })?;
        }
        let mut filters = HashSet::new();
        for filter in &self.signals.filters {
            if !filters.insert(filter.as_str()) {
                return Err(ConfigError::DuplicateFilter(filter.clone()));
            }
        }
        if let (Some(start), Some(end)) = (self.data.start_date, self.data.end_date) {
            if start > end {
                return Err(ConfigError::BadDateRange { start, end });
            }
        }
        self.timezone()?;
        self.session_window()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.data
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.data.timezone.clone()))
    }

    pub fn session_window(&self) -> Result<Option<SessionWindow>, ConfigError> {
        match &self.session {
            Some(s) => Ok(Some(SessionWindow::parse(&s.start, &s.end, self.timezone()?)?)),
            None => Ok(None),
        }
    }

    /// UTC bounds of the configured date range: local midnight of
    /// `start_date` up to the last instant of `end_date`.
    pub fn time_bounds(
        &self,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), ConfigError> {
        let tz = self.timezone()?;
        let start = self.data.start_date.map(|d| local_midnight(tz, d));
        let end = self
            .data
            .end_date
            .and_then(|d| d.succ_opt())
            .map(|d| local_midnight(tz, d) - Duration::nanoseconds(1));
        Ok((start, end))
    }
}

fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[data]
path = "eur_usd.csv"
start_date = "2024-01-01"
end_date = "2024-03-31"

[engine]
execution_timeframe = "30s"
allow_multiple_trades = true

[signals]
signal_timeframe = "15min"
filters = ["Volume", "Body"]

[session]
start = "22:00"
end = "07:00"

[[scenarios]]
risk_reward_ratio = 2.0

[[scenarios]]
risk_reward_ratio = 3.0
use_breakeven = true
breakeven_trigger_r = 1.5
"#;

    #[test]
    fn parses_full_config() {
        let cfg = BacktestConfig::from_toml_str(FULL).unwrap();
        assert_eq!(cfg.data.path, PathBuf::from("eur_usd.csv"));
        assert_eq!(cfg.data.timezone, DEFAULT_TIMEZONE);
        assert_eq!(cfg.engine.execution_timeframe.as_str(), "30s");
        assert!(cfg.engine.allow_multiple_trades);
        assert_eq!(
            cfg.signals.signal_timeframe,
            Some(Timeframe::new("15min").unwrap())
        );
        assert_eq!(cfg.signals.filters, ["Volume", "Body"]);
        assert_eq!(cfg.scenarios.len(), 2);
        assert_eq!(cfg.scenarios[1].name(), "3.0R_BE");
        cfg.validate().unwrap();

        let window = cfg.session_window().unwrap().unwrap();
        assert!(window.wraps_midnight());
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = BacktestConfig::from_toml_str(
            r#"
[data]
path = "x.csv"
[engine]
execution_timeframe = "1min"
[[scenarios]]
risk_reward_ratio = 1.0
"#,
        )
        .unwrap();
        assert!(!cfg.engine.allow_multiple_trades);
        assert!(cfg.signals.signal_timeframe.is_none());
        assert!(cfg.signals.filters.is_empty());
        assert!(cfg.session.is_none());
        assert_eq!(cfg.time_bounds().unwrap(), (None, None));
        cfg.validate().unwrap();
    }

    #[test]
    fn validation_errors() {
        let base = BacktestConfig::from_toml_str(FULL).unwrap();

        let mut cfg = base.clone();
        cfg.scenarios.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::NoScenarios)));

        let mut cfg = base.clone();
        cfg.scenarios[0].risk_reward_ratio = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidScenario { index: 0, .. })
        ));

        let mut cfg = base.clone();
        cfg.data.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadDateRange { .. })
        ));

        let mut cfg = base.clone();
        cfg.data.timezone = "Mars/Olympus".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnknownTimezone(_))
        ));

        let mut cfg = base.clone();
        cfg.signals.filters.push("Volume".into());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateFilter(f)) if f == "Volume"
        ));

        let mut cfg = base;
        cfg.session = Some(SessionConfig {
            start: "25:00".into(),
            end: "07:00".into(),
        });
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadSessionTime(_))
        ));
    }

    #[test]
    fn scenarios_that_share_a_name_are_rejected() {
        let mut cfg = BacktestConfig::from_toml_str(FULL).unwrap();
        // Same RR and breakeven flag, different trigger: both are "3.0R_BE".
        cfg.scenarios.push(Scenario::new(3.0).with_breakeven(0.5));
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateScenario(name)) if name == "3.0R_BE"
        ));

        // RR values that round to the same label collide too.
        cfg.scenarios.pop();
        cfg.scenarios.push(Scenario::new(2.04));
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DuplicateScenario(name)) if name == "2.0R"
        ));
    }

    #[test]
    fn time_bounds_follow_local_calendar() {
        let cfg = BacktestConfig::from_toml_str(FULL).unwrap();
        let (start, end) = cfg.time_bounds().unwrap();
        // New York midnight on Jan 1 is 05:00 UTC.
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap()));
        // End of Mar 31 (EDT, UTC-4) is just before Apr 1 04:00 UTC.
        assert_eq!(
            end,
            Some(Utc.with_ymd_and_hms(2024, 4, 1, 4, 0, 0).unwrap() - Duration::nanoseconds(1))
        );
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            BacktestConfig::from_toml_str("[data\npath = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
