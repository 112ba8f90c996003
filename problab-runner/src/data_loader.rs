//! Observation loading from files produced by the prediction backend.
//!
//! Two formats, chosen by file extension:
//! - `.csv` with header `date,predicted_probability,market_return`
//!   (`prob` is accepted in place of `predicted_probability`)
//! - `.json` holding either a bare array of observations or the prediction
//!   API's response object, whose `backtest_data` field carries the array
//!
//! Rows are kept in file order. Values are checked here, at the boundary:
//! probabilities must be finite and within `[0, 1]`, returns must be finite.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use problab_core::DailyObservation;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: predicted probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange { row: usize, value: f64 },

    #[error("row {row}: {field} is not a finite number")]
    NonFinite { row: usize, field: &'static str },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Series(Vec<DailyObservation>),
    ApiResponse { backtest_data: Vec<DailyObservation> },
}

/// Load and validate a series from disk.
pub fn load_observations(path: &Path) -> Result<Vec<DailyObservation>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let series = match extension.as_str() {
        "csv" => parse_csv(&content)?,
        "json" => parse_json(&content)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    debug!(path = %path.display(), observations = series.len(), "loaded series");
    Ok(series)
}

/// Parse CSV text with a header row.
pub fn parse_csv(content: &str) -> Result<Vec<DailyObservation>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let series = reader
        .deserialize::<DailyObservation>()
        .collect::<Result<Vec<_>, _>>()?;
    validate_series(&series)?;
    Ok(series)
}

/// Parse a JSON array or a prediction API response.
pub fn parse_json(content: &str) -> Result<Vec<DailyObservation>, LoadError> {
    let series = match serde_json::from_str::<JsonInput>(content)? {
        JsonInput::Series(series) => series,
        JsonInput::ApiResponse { backtest_data } => backtest_data,
    };
    validate_series(&series)?;
    Ok(series)
}

/// Boundary checks. Rows are numbered from 1.
pub fn validate_series(series: &[DailyObservation]) -> Result<(), LoadError> {
    for (i, obs) in series.iter().enumerate() {
        let row = i + 1;
        if !obs.predicted_probability.is_finite() {
            return Err(LoadError::NonFinite {
                row,
                field: "predicted_probability",
            });
        }
        if !(0.0..=1.0).contains(&obs.predicted_probability) {
            return Err(LoadError::ProbabilityOutOfRange {
                row,
                value: obs.predicted_probability,
            });
        }
        if !obs.market_return.is_finite() {
            return Err(LoadError::NonFinite {
                row,
                field: "market_return",
            });
        }
    }
    Ok(())
}
