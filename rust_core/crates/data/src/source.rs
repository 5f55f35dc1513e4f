use std::path::{Path, PathBuf};

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, warn};

use crate::error::DataError;
use crate::loader::{filter_by_date_range, load_bars, resolve_data_root, resolve_symbol_path};
use crate::validation::validate_bars;
use stockscope_types::PriceSeries;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateRange {
    /// First date, inclusive.
    pub start: NaiveDate,
    /// Last date, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    ///
    /// # Errors
    /// [`DataError::CorruptData`] when the bounds are inverted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DataError> {
        if start > end {
            return Err(DataError::CorruptData(format!(
                "Inverted date range: {start} > {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// True when `date` lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Range from the first day of the month `months` back up to `today`.
///
/// `lookback_range(2024-03-15, 2)` spans 2024-01-01 ..= 2024-03-15.
/// Returns `None` only when the start date would leave chrono's range.
#[must_use]
pub fn lookback_range(today: NaiveDate, months: u32) -> Option<DateRange> {
    let start = today
        .with_day(1)?
        .checked_sub_months(Months::new(months))?;
    Some(DateRange { start, end: today })
}

/// Port for the data-fetcher collaborator: one ticker in, daily bars out.
///
/// Implementations own authentication, pagination and retries; the core
/// only sees a validated, ascending [`PriceSeries`].
pub trait PriceSource: Send + Sync {
    /// Fetches daily bars for `symbol` within `range`.
    ///
    /// # Errors
    /// Implementation-specific [`DataError`]s; malformed rows surface as
    /// [`DataError::CorruptData`].
    fn fetch(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, DataError>;
}

/// Reads `<root>/<SYMBOL>.json` files written by an offline fetcher.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at `$STOCKSCOPE_DATA_ROOT` (or `data/prices`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(resolve_data_root())
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PriceSource for FileSource {
    fn fetch(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, DataError> {
        let path = resolve_symbol_path(&self.root, symbol);
        if !path.exists() {
            warn!(symbol, path = %path.display(), "no price file for symbol");
            return Err(DataError::UnknownSymbol(symbol.to_string()));
        }

        let bars = load_bars(&path)?;
        validate_bars(&bars)?;
        let bars = filter_by_date_range(&bars, range.start, range.end)?;
        debug!(symbol, bars = bars.len(), start = %range.start, end = %range.end, "fetched series");
        Ok(PriceSeries::new(bars))
    }
}
