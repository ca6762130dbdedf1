//! CSV ingestion into a [`PriceSeries`].
//!
//! The first column is the timestamp (`timestamp`, `time` or `datetime`),
//! either RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f]` taken as UTC. Every other
//! column is numeric; empty cells become NaN.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rlab_core::domain::{PriceSeries, SeriesError};
use thiserror::Error;

const TIMESTAMP_HEADERS: [&str; 3] = ["timestamp", "time", "datetime"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("first column must be one of timestamp/time/datetime, found '{0}'")]
    MissingTimestampColumn(String),

    #[error("row {row}: cannot parse timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}, column '{column}': cannot parse '{value}' as a number")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Load a CSV file.
pub fn load_csv(path: &Path) -> Result<PriceSeries, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_series(file)?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        series.len(),
        series.column_names().count(),
        path.display()
    );
    Ok(series)
}

/// Parse CSV from any reader. Rows are numbered from 1 (header excluded).
pub fn read_series<R: Read>(reader: R) -> Result<PriceSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let first = headers.get(0).unwrap_or_default();
    if !TIMESTAMP_HEADERS.contains(&first.to_ascii_lowercase().as_str()) {
        return Err(LoadError::MissingTimestampColumn(first.to_string()));
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let raw_ts = record.get(0).unwrap_or_default();
        let ts = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            row,
            value: raw_ts.to_string(),
        })?;
        timestamps.push(ts);

        for (col, (name, values)) in names.iter().zip(columns.iter_mut()).enumerate() {
            let cell = record.get(col + 1).unwrap_or_default();
            values.push(parse_cell(cell).ok_or_else(|| LoadError::BadValue {
                row,
                column: name.clone(),
                value: cell.to_string(),
            })?);
        }
    }

    let mut series = PriceSeries::new(timestamps)?;
    for (name, values) in names.into_iter().zip(columns) {
        series.insert_column(name, values)?;
    }
    Ok(series)
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.f]` / `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    // Boolean mask columns.
    if cell.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    cell.parse::<f64>().ok()
}
