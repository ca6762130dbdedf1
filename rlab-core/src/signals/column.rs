//! Column signals: reads precomputed `signal` / `entry_price` / `sl_price` columns.

use crate::domain::{Direction, PriceSeries, Signal};

use super::{SignalError, SignalSource};

pub const SIGNAL_COLUMN: &str = "signal";
pub const ENTRY_PRICE_COLUMN: &str = "entry_price";
pub const STOP_PRICE_COLUMN: &str = "sl_price";

/// Signals taken straight from the input table.
///
/// `signal` holds 1 (long), -1 (short), 0 or blank (none). Entry and stop
/// prices come from the same row; blank cells become `None`.
#[derive(Debug, Clone, Default)]
pub struct ColumnSignals;

impl ColumnSignals {
    /// Check that `series` carries the three signal columns and that every
    /// signal value is -1, 0, 1 or blank.
    pub fn for_series(series: &PriceSeries) -> Result<Self, SignalError> {
        for name in [SIGNAL_COLUMN, ENTRY_PRICE_COLUMN, STOP_PRICE_COLUMN] {
            if !series.has_column(name) {
                return Err(SignalError::MissingColumn(name.to_string()));
            }
        }
        let signals = series.column(SIGNAL_COLUMN).unwrap_or(&[]);
        if let Some((row, &value)) = signals
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_nan() || **v == 0.0 || **v == 1.0 || **v == -1.0))
        {
            return Err(SignalError::InvalidDirection { row, value });
        }
        Ok(Self)
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl SignalSource for ColumnSignals {
    fn name(&self) -> &str {
        "columns"
    }

    fn produce_signal(&self, series: &PriceSeries, index: usize) -> Option<Signal> {
        let direction = Direction::from_signal_value(series.value(SIGNAL_COLUMN, index)?)?;
        Some(Signal {
            direction,
            entry_price: present(series.value(ENTRY_PRICE_COLUMN, index)),
            stop_price: present(series.value(STOP_PRICE_COLUMN, index)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(signal: Vec<f64>, entry: Vec<f64>, stop: Vec<f64>) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        PriceSeries::new((0..signal.len()).map(|i| start + Duration::minutes(i as i64)).collect())
            .unwrap()
            .with_column(SIGNAL_COLUMN, signal)
            .unwrap()
            .with_column(ENTRY_PRICE_COLUMN, entry)
            .unwrap()
            .with_column(STOP_PRICE_COLUMN, stop)
            .unwrap()
    }

    #[test]
    fn reads_direction_and_prices() {
        let s = series(
            vec![0.0, 1.0, -1.0, f64::NAN],
            vec![f64::NAN, 100.0, 50.0, 1.0],
            vec![f64::NAN, 99.0, f64::NAN, 1.0],
        );
        let src = ColumnSignals::for_series(&s).unwrap();

        assert_eq!(src.produce_signal(&s, 0), None);
        assert_eq!(src.produce_signal(&s, 1), Some(Signal::long(100.0, 99.0)));

        let short = src.produce_signal(&s, 2).unwrap();
        assert_eq!(short.direction, Direction::Short);
        assert_eq!(short.entry_price, Some(50.0));
        assert_eq!(short.stop_price, None);

        assert_eq!(src.produce_signal(&s, 3), None);
        assert_eq!(src.produce_signal(&s, 99), None);
    }

    #[test]
    fn missing_column_is_an_error() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let s = PriceSeries::new(vec![start])
            .unwrap()
            .with_column(SIGNAL_COLUMN, vec![1.0])
            .unwrap();
        assert_eq!(
            ColumnSignals::for_series(&s).unwrap_err(),
            SignalError::MissingColumn(ENTRY_PRICE_COLUMN.into())
        );
    }

    #[test]
    fn rejects_out_of_range_signal_values() {
        let s = series(vec![0.0, 2.0], vec![1.0, 1.0], vec![0.5, 0.5]);
        assert_eq!(
            ColumnSignals::for_series(&s).unwrap_err(),
            SignalError::InvalidDirection { row: 1, value: 2.0 }
        );
    }
}
