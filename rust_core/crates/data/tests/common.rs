use std::path::Path;

use chrono::NaiveDate;
use stockscope_types::PriceBar;

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(offset)
}

pub fn sample_bars() -> Vec<PriceBar> {
    vec![
        PriceBar {
            date: day(0),
            open: 10.0,
            high: 10.6,
            low: 9.8,
            close: 10.4,
            volume: 12_000.0,
        },
        PriceBar {
            date: day(1),
            open: 10.4,
            high: 10.9,
            low: 10.1,
            close: 10.8,
            volume: 15_500.0,
        },
        PriceBar {
            date: day(2),
            open: 10.8,
            high: 11.0,
            low: 10.5,
            close: 10.6,
            volume: 9_800.0,
        },
    ]
}

pub fn write_bars_json(path: &Path, bars: &[PriceBar]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(bars)?;
    std::fs::write(path, json)?;
    Ok(())
}
