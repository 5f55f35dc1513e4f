//! Windowed calculators, one per indicator family.
//!
//! Each calculator owns its configuration section and implements
//! [`WindowedIndicator`](crate::traits::WindowedIndicator). Series-level
//! values come from the primitives in [`impl_`](crate::impl_); the
//! calculators add latest values, per-window events and trends.

pub mod boll;
pub mod candlestick;
pub mod kdj;
pub mod ma_system;
pub mod macd;
pub mod rsi;

pub use boll::BollCalculator;
pub use candlestick::CandlestickCalculator;
pub use kdj::KdjCalculator;
pub use ma_system::MaSystem;
pub use macd::MacdCalculator;
pub use rsi::RsiCalculator;

/// Last finite value of `values`, or `None`.
pub(crate) fn last_finite(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| v.is_finite())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use stockscope_types::{PriceBar, PriceSeries};

    /// Bars with open = high = low = close.
    pub fn flat_bars(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Bars with a one-point range around each close.
    pub fn ranged_bars(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000.0,
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// `100 * 1.01^i`.
    pub fn geometric(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.01_f64.powi(i as i32)).collect()
    }
}
