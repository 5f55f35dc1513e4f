//! Data-layer error types.

use thiserror::Error;

/// Errors that can occur while loading or validating price data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required file was not found on disk.
    #[error("File not found: {0} ({1})")]
    FileNotFound(String, String),

    /// JSON parsing or decoding failed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No bars were loaded.
    #[error("Empty data")]
    EmptyData,

    /// Date-range filtering removed all bars.
    #[error("Date-range filter produced empty result: start={start}, end={end}")]
    DateRangeEmpty {
        /// Inclusive start date.
        start: chrono::NaiveDate,
        /// Inclusive end date.
        end: chrono::NaiveDate,
    },

    /// Data violated a series invariant (ordering, finiteness, OHLC consistency).
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// The source has no data for the requested symbol.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl DataError {
    /// True for errors that mean the input itself is malformed, as opposed to
    /// missing files or unknown symbols.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DataError::ParseError(_) | DataError::EmptyData | DataError::CorruptData(_)
        )
    }
}
