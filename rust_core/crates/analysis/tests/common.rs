#![allow(dead_code)]

use chrono::NaiveDate;
use proptest::prelude::*;
use stockscope_types::{PriceBar, PriceSeries};

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(offset as i64)
}

/// Bars with open at the previous close and `spread` added beyond the body.
pub fn bars_from_closes(closes: &[f64], spread: f64) -> Vec<PriceBar> {
    let mut prev = closes.first().copied().unwrap_or(0.0);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = prev;
            prev = close;
            PriceBar {
                date: day(i),
                open,
                high: open.max(close) + spread,
                low: open.min(close) - spread,
                close,
                volume: 50_000.0 + (i % 7) as f64 * 1_000.0,
            }
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64], spread: f64) -> PriceSeries {
    PriceSeries::new(bars_from_closes(closes, spread))
}

pub fn geometric_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 * 1.01_f64.powi(i as i32)).collect()
}

pub fn random_walk(len: std::ops::Range<usize>) -> impl Strategy<Value = PriceSeries> {
    (10.0f64..300.0, prop::collection::vec(-0.04f64..0.04, len)).prop_map(|(start, steps)| {
        let mut close = start;
        let closes: Vec<f64> = steps
            .into_iter()
            .map(|ret| {
                close = (close * (1.0 + ret)).max(0.5);
                close
            })
            .collect();
        series_from_closes(&closes, 0.25)
    })
}
