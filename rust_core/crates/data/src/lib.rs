//! Stockscope Data
//!
//! JSON price loading, series validation, and the price-source port.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

/// Data-layer error types.
pub mod error;
/// JSON loading and date filters.
pub mod loader;
/// Price-source port and file-backed implementation.
pub mod source;
/// Series validation helpers.
pub mod validation;

/// Re-export: data-layer error type.
pub use error::DataError;
/// Re-export: date-range filter for bars.
pub use loader::filter_by_date_range;
/// Re-export: load and validate a series.
pub use loader::load_and_validate;
/// Re-export: load bars from JSON.
pub use loader::load_bars;
/// Re-export: parse bars from a JSON string.
pub use loader::parse_bars;
/// Re-export: resolve the price-file root.
pub use loader::resolve_data_root;
/// Re-export: resolve a symbol's price file.
pub use loader::resolve_symbol_path;
/// Re-export: inclusive date range.
pub use source::DateRange;
/// Re-export: file-backed price source.
pub use source::FileSource;
/// Re-export: data-fetcher port.
pub use source::PriceSource;
/// Re-export: month-start lookback range.
pub use source::lookback_range;
/// Re-export: largest accepted price or volume.
pub use validation::MAX_MAGNITUDE;
/// Re-export: bar validation.
pub use validation::validate_bars;
/// Re-export: validate and wrap bars.
pub use validation::validated_series;
