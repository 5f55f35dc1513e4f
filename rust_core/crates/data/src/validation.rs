//! Series validation helpers.

use crate::error::DataError;
use stockscope_types::{PriceBar, PriceSeries};

/// Largest accepted price or volume. Rolling sums and squared deviations of
/// values up to this size stay finite.
pub const MAX_MAGNITUDE: f64 = 1e15;

/// Validates a sequence of daily bars before any indicator runs.
///
/// # Errors
/// - [`DataError::EmptyData`] when `bars` is empty.
/// - [`DataError::CorruptData`] on non-finite values, values above
///   [`MAX_MAGNITUDE`], negative volume, inconsistent OHLC or dates that are
///   not strictly increasing.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptyData);
    }

    for (i, bar) in bars.iter().enumerate() {
        if !bar.open.is_finite()
            || !bar.high.is_finite()
            || !bar.low.is_finite()
            || !bar.close.is_finite()
            || !bar.volume.is_finite()
        {
            return Err(DataError::CorruptData(format!(
                "NaN/Inf at index {i} ({}): {bar:?}",
                bar.date
            )));
        }

        let largest = [bar.open, bar.high, bar.low, bar.close, bar.volume]
            .into_iter()
            .map(f64::abs)
            .fold(0.0, f64::max);
        if largest > MAX_MAGNITUDE {
            return Err(DataError::CorruptData(format!(
                "Value {largest:e} above {MAX_MAGNITUDE:e} at index {i} ({})",
                bar.date
            )));
        }

        if bar.volume < 0.0 {
            return Err(DataError::CorruptData(format!(
                "Negative volume at index {i} ({}): {}",
                bar.date, bar.volume
            )));
        }

        if bar.low > bar.open
            || bar.low > bar.close
            || bar.high < bar.open
            || bar.high < bar.close
            || bar.low > bar.high
        {
            return Err(DataError::CorruptData(format!(
                "Invalid OHLC at index {i} ({}): low={}, high={}, open={}, close={}",
                bar.date, bar.low, bar.high, bar.open, bar.close
            )));
        }

        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(DataError::CorruptData(format!(
                "Non-monotonic date at index {i}: {} <= {}",
                bar.date,
                bars[i - 1].date
            )));
        }
    }

    Ok(())
}

/// Validates bars and wraps them into a [`PriceSeries`].
///
/// # Errors
/// Same as [`validate_bars`].
pub fn validated_series(bars: Vec<PriceBar>) -> Result<PriceSeries, DataError> {
    validate_bars(&bars)?;
    Ok(PriceSeries::new(bars))
}
