use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::DataError;
use crate::validation::validate_bars;
use stockscope_types::{PriceBar, PriceSeries};

/// Environment variable overriding the price-file root directory.
pub const DATA_ROOT_ENV: &str = "STOCKSCOPE_DATA_ROOT";

const DEFAULT_DATA_ROOT: &str = "data/prices";

/// Resolve the price-file root from the environment or the default layout.
#[must_use]
pub fn resolve_data_root() -> PathBuf {
    std::env::var(DATA_ROOT_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_DATA_ROOT), PathBuf::from)
}

/// Resolve the JSON file holding the daily bars of `symbol` under `root`.
#[must_use]
pub fn resolve_symbol_path(root: &Path, symbol: &str) -> PathBuf {
    root.join(format!("{}.json", symbol.to_uppercase()))
}

/// Parses a JSON array of bars (`[{"date": "2024-01-02", "open": ..}, ..]`).
///
/// Rows are returned as found; call [`validate_bars`] before use.
///
/// # Errors
/// - [`DataError::ParseError`] when the JSON does not decode into bars.
/// - [`DataError::EmptyData`] when the array is empty.
pub fn parse_bars(json: &str) -> Result<Vec<PriceBar>, DataError> {
    let bars: Vec<PriceBar> =
        serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;
    if bars.is_empty() {
        return Err(DataError::EmptyData);
    }
    Ok(bars)
}

/// Loads bars from a JSON file.
///
/// # Errors
/// - [`DataError::FileNotFound`] when the file cannot be read.
/// - Any error from [`parse_bars`].
pub fn load_bars(path: &Path) -> Result<Vec<PriceBar>, DataError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| DataError::FileNotFound(path.display().to_string(), e.to_string()))?;
    let bars = parse_bars(&json)?;
    debug!(path = %path.display(), bars = bars.len(), "loaded price bars");
    Ok(bars)
}

/// Convenience: load and validate a series.
///
/// # Errors
/// Any error from [`load_bars`] or [`validate_bars`].
pub fn load_and_validate(path: &Path) -> Result<PriceSeries, DataError> {
    let bars = load_bars(path)?;
    validate_bars(&bars)?;
    Ok(PriceSeries::new(bars))
}

/// Keeps bars with `start <= date <= end`.
///
/// # Errors
/// [`DataError::DateRangeEmpty`] when no bar falls inside the range.
pub fn filter_by_date_range(
    bars: &[PriceBar],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, DataError> {
    let filtered: Vec<PriceBar> = bars
        .iter()
        .filter(|b| b.date >= start && b.date <= end)
        .copied()
        .collect();

    if filtered.is_empty() {
        return Err(DataError::DateRangeEmpty { start, end });
    }
    Ok(filtered)
}
