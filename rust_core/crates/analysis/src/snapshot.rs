//! Latest-bar market snapshot and the full analysis report.

use chrono::NaiveDate;
use stockscope_indicators::IndicatorSummary;
use stockscope_types::PriceSeries;

/// Latest close and day-over-day changes.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketSnapshot {
    /// Date of the latest bar
    pub date: NaiveDate,
    /// Latest close
    pub close: f64,
    /// Close change vs. the previous close, in percent
    pub change_pct: Option<f64>,
    /// Latest volume
    pub volume: f64,
    /// Volume change vs. the previous bar, in percent
    pub volume_change_pct: Option<f64>,
}

impl MarketSnapshot {
    /// Snapshot of the last bar, or `None` for an empty series.
    ///
    /// Changes are `None` on a single-bar series or when the previous
    /// value is zero.
    #[must_use]
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let bars = series.bars();
        let last = bars.last()?;
        let prev = bars.len().checked_sub(2).map(|i| &bars[i]);

        Some(Self {
            date: last.date,
            close: last.close,
            change_pct: prev.and_then(|p| pct_change(p.close, last.close)),
            volume: last.volume,
            volume_change_pct: prev.and_then(|p| pct_change(p.volume, last.volume)),
        })
    }
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    (from.abs() > f64::EPSILON).then(|| (to - from) / from * 100.0)
}

/// Document handed to the reporting collaborator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisReport {
    /// Ticker the series belongs to
    pub symbol: String,
    /// Date of the latest bar
    pub as_of: NaiveDate,
    /// Number of bars analyzed
    pub bars: usize,
    /// Latest-bar snapshot
    pub snapshot: MarketSnapshot,
    /// Per-indicator outcomes
    pub indicators: IndicatorSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stockscope_types::PriceBar;

    fn bar(day: u32, close: f64, volume: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    #[test]
    fn test_snapshot_changes() {
        let series = PriceSeries::new(vec![bar(4, 10.0, 2_000.0), bar(5, 10.5, 3_000.0)]);
        let snapshot = MarketSnapshot::from_series(&series).unwrap();

        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_relative_eq!(snapshot.close, 10.5);
        assert_relative_eq!(snapshot.change_pct.unwrap(), 5.0, epsilon = 1e-10);
        assert_relative_eq!(snapshot.volume_change_pct.unwrap(), 50.0, epsilon = 1e-10);
    }

    #[test]
    fn test_snapshot_single_bar_and_zero_volume() {
        let single = PriceSeries::new(vec![bar(4, 10.0, 0.0)]);
        let snapshot = MarketSnapshot::from_series(&single).unwrap();
        assert!(snapshot.change_pct.is_none());
        assert!(snapshot.volume_change_pct.is_none());

        let series = PriceSeries::new(vec![bar(4, 10.0, 0.0), bar(5, 9.0, 100.0)]);
        let snapshot = MarketSnapshot::from_series(&series).unwrap();
        assert_relative_eq!(snapshot.change_pct.unwrap(), -10.0, epsilon = 1e-10);
        assert!(snapshot.volume_change_pct.is_none());
    }

    #[test]
    fn test_snapshot_empty_series() {
        assert!(MarketSnapshot::from_series(&PriceSeries::default()).is_none());
    }
}
