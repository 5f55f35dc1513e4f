use std::path::PathBuf;

use temp_env::with_var;
use tempfile::tempdir;

use stockscope_data::{
    DataError, DateRange, FileSource, MAX_MAGNITUDE, PriceSource, filter_by_date_range,
    load_and_validate, load_bars, parse_bars, resolve_data_root, resolve_symbol_path,
    validate_bars,
};

mod common;
use common::{day, sample_bars, write_bars_json};
use proptest::prelude::*;

#[test]
fn test_load_bars_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("600519.json");
    let bars = sample_bars();
    write_bars_json(&path, &bars).unwrap();

    let loaded = load_bars(&path).unwrap();
    assert_eq!(loaded, bars);
}

#[test]
fn test_load_bars_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_bars(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DataError::FileNotFound(_, _)));
}

#[test]
fn test_parse_bars_rejects_missing_field() {
    let err = parse_bars(r#"[{"date": "2024-01-02", "open": 1.0, "high": 1.0, "low": 1.0}]"#)
        .unwrap_err();
    assert!(matches!(err, DataError::ParseError(_)));
    assert!(err.is_malformed_input());
}

#[test]
fn test_parse_bars_rejects_non_numeric_price() {
    let err = parse_bars(
        r#"[{"date": "2024-01-02", "open": "x", "high": 1.0, "low": 1.0, "close": 1.0, "volume": 1}]"#,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::ParseError(_)));
}

#[test]
fn test_parse_bars_rejects_empty_array() {
    let err = parse_bars("[]").unwrap_err();
    assert!(matches!(err, DataError::EmptyData));
}

#[test]
fn test_parse_bars_accepts_integer_volume() {
    let bars = parse_bars(
        r#"[{"date": "2024-01-02", "open": 1.0, "high": 1.2, "low": 0.9, "close": 1.1, "volume": 3500}]"#,
    )
    .unwrap();
    assert_eq!(bars.len(), 1);
    assert!((bars[0].volume - 3500.0).abs() < 1e-12);
}

#[test]
fn test_load_and_validate_rejects_nan() {
    let mut bars = sample_bars();
    bars[1].close = f64::NAN;
    let err = validate_bars(&bars).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
}

#[test]
fn test_load_and_validate_rejects_non_monotonic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bars.json");
    let mut bars = sample_bars();
    bars.swap(0, 1);
    write_bars_json(&path, &bars).unwrap();

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
}

#[test]
fn test_validate_rejects_duplicate_date() {
    let mut bars = sample_bars();
    bars[1].date = bars[0].date;
    let err = validate_bars(&bars).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
}

#[test]
fn test_validate_rejects_invalid_ohlc() {
    let mut bars = sample_bars();
    bars[2].high = bars[2].low - 0.1;
    let err = validate_bars(&bars).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
}

#[test]
fn test_validate_rejects_negative_volume() {
    let mut bars = sample_bars();
    bars[0].volume = -1.0;
    let err = validate_bars(&bars).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
}

#[test]
fn test_validate_rejects_oversized_values() {
    let mut bars = sample_bars();
    for bar in &mut bars {
        bar.open = 1e307;
        bar.high = 1e307;
        bar.low = 1e307;
        bar.close = 1e307;
    }
    let err = validate_bars(&bars).unwrap_err();
    assert!(matches!(err, DataError::CorruptData(_)));
    assert!(err.is_malformed_input());

    let mut bars = sample_bars();
    bars[1].volume = MAX_MAGNITUDE * 10.0;
    assert!(validate_bars(&bars).is_err());

    let mut bars = sample_bars();
    bars[1].volume = MAX_MAGNITUDE;
    assert!(validate_bars(&bars).is_ok());
}

#[test]
fn test_validate_rejects_empty() {
    let err = validate_bars(&[]).unwrap_err();
    assert!(matches!(err, DataError::EmptyData));
}

#[test]
fn test_filter_by_date_range_inclusive() {
    let bars = sample_bars();
    let filtered = filter_by_date_range(&bars, day(1), day(2)).unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].date, day(1));
}

#[test]
fn test_filter_by_date_range_empty_result() {
    let bars = sample_bars();
    let err = filter_by_date_range(&bars, day(10), day(20)).unwrap_err();
    assert!(matches!(err, DataError::DateRangeEmpty { .. }));
}

#[test]
fn test_resolve_data_root_env_override() {
    let dir = tempdir().unwrap();
    with_var("STOCKSCOPE_DATA_ROOT", Some(dir.path()), || {
        let root = resolve_data_root();
        assert_eq!(root, dir.path());
        let path = resolve_symbol_path(&root, "aapl");
        assert!(path.ends_with(PathBuf::from("AAPL.json")));
    });
}

#[test]
fn test_file_source_fetch_filters_range() {
    let dir = tempdir().unwrap();
    write_bars_json(&dir.path().join("AAPL.json"), &sample_bars()).unwrap();

    let source = FileSource::new(dir.path());
    let range = DateRange::new(day(1), day(5)).unwrap();
    let series = source.fetch("aapl", range).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.bars()[0].date, day(1));
}

#[test]
fn test_file_source_unknown_symbol() {
    let dir = tempdir().unwrap();
    let source = FileSource::new(dir.path());
    let range = DateRange::new(day(0), day(5)).unwrap();

    let err = source.fetch("MSFT", range).unwrap_err();
    assert!(matches!(err, DataError::UnknownSymbol(_)));
    assert!(!err.is_malformed_input());
}

#[test]
fn test_file_source_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let mut bars = sample_bars();
    bars[2].low = f64::INFINITY;
    // serde_json writes non-finite floats as null
    write_bars_json(&dir.path().join("BAD.json"), &bars).unwrap();

    let source = FileSource::new(dir.path());
    let range = DateRange::new(day(0), day(5)).unwrap();
    let err = source.fetch("BAD", range).unwrap_err();
    assert!(err.is_malformed_input());
}

proptest! {
    #[test]
    fn prop_generated_sequences_validate(bars in generators::valid_bar_sequence(30)) {
        prop_assert!(validate_bars(&bars).is_ok());
    }

    #[test]
    fn prop_filter_keeps_only_in_range(
        bars in generators::valid_bar_sequence(20),
        from in 0usize..20,
        span in 0usize..20,
    ) {
        let to = (from + span).min(19);
        let start = bars[from].date;
        let end = bars[to].date;
        let filtered = filter_by_date_range(&bars, start, end).unwrap();
        prop_assert_eq!(filtered.len(), to - from + 1);
        prop_assert!(filtered.iter().all(|b| b.date >= start && b.date <= end));
    }
}
