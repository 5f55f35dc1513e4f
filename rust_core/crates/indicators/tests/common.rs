//! Shared series builders and generators for indicator integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use proptest::prelude::*;
use stockscope_types::{PriceBar, PriceSeries};

/// First trading day used by the builders.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Series whose bars span `close ± spread` with open at the previous close.
pub fn series_from_closes(closes: &[f64], spread: f64) -> PriceSeries {
    let mut prev = closes.first().copied().unwrap_or(0.0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = prev;
            prev = close;
            PriceBar {
                date: start_date() + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + spread,
                low: open.min(close) - spread,
                close,
                volume: 10_000.0 + i as f64,
            }
        })
        .collect::<Vec<_>>()
        .into()
}

/// `100 * 1.01^i` for `n` bars.
pub fn geometric_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 * 1.01_f64.powi(i as i32)).collect()
}

/// Random-walk bar series of `len` bars with consistent OHLC.
pub fn random_walk(len: usize) -> impl Strategy<Value = PriceSeries> {
    (
        20.0f64..500.0,
        prop::collection::vec((-0.05f64..0.05, 0.0f64..0.03, 0.0f64..1e6), len..=len),
    )
        .prop_map(|(start, steps)| {
            let mut close = start;
            let bars: Vec<PriceBar> = steps
                .into_iter()
                .enumerate()
                .map(|(i, (ret, wick, volume))| {
                    let open = close;
                    close = (close * (1.0 + ret)).max(0.01);
                    PriceBar {
                        date: start_date() + chrono::Duration::days(i as i64),
                        open,
                        high: open.max(close) * (1.0 + wick),
                        low: open.min(close) * (1.0 - wick),
                        close,
                        volume,
                    }
                })
                .collect();
            PriceSeries::new(bars)
        })
}
