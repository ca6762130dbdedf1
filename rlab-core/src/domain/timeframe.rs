//! Timeframe: label of a candle granularity and the columns it names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeframeError {
    #[error("timeframe label is empty")]
    Empty,
    #[error("timeframe label '{0}' may only contain ASCII letters and digits")]
    InvalidLabel(String),
}

/// A candle granularity such as `30s`, `15min` or `1h`.
///
/// The engine never interprets the duration. The label only selects columns:
/// a series carrying the `15min` timeframe has `open_15min`, `high_15min`,
/// `low_15min` and `close_15min`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe(String);

impl Timeframe {
    pub fn new(label: impl Into<String>) -> Result<Self, TimeframeError> {
        let label = label.into();
        if label.is_empty() {
            return Err(TimeframeError::Empty);
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TimeframeError::InvalidLabel(label));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn open_column(&self) -> String {
        format!("open_{}", self.0)
    }

    pub fn high_column(&self) -> String {
        format!("high_{}", self.0)
    }

    pub fn low_column(&self) -> String {
        format!("low_{}", self.0)
    }

    pub fn close_column(&self) -> String {
        format!("close_{}", self.0)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.0
    }
}
