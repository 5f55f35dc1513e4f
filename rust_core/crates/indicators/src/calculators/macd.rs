//! MACD calculator

use stockscope_types::{MacdConfig, PriceSeries, WindowTag};
use tracing::debug;

use crate::calculators::last_finite;
use crate::error::IndicatorError;
use crate::impl_::macd::MACD;
use crate::report::{IndicatorKind, IndicatorReport, SignalEvent, SignalKind, WindowTrend};
use crate::signals::{
    LineScale, crossover_event, divergence_event, mean_close, sample_std, window_trend,
};
use crate::traits::{MultiOutputIndicator, WindowedIndicator};
use crate::window::WindowSet;

/// Shape of the histogram over its last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramPhase {
    /// Above zero and growing
    PositiveExpanding,
    /// Above zero and shrinking
    PositiveContracting,
    /// Below zero and growing in magnitude
    NegativeExpanding,
    /// Below zero and shrinking in magnitude
    NegativeContracting,
    /// At zero
    Flat,
}

/// Size of the latest histogram bar relative to its recent dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdStrength {
    /// Beyond two standard deviations
    Extreme,
    /// Beyond one standard deviation
    Strong,
    /// Within one standard deviation
    Normal,
}

/// MACD summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MacdReport {
    /// Latest MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Latest signal line
    pub signal: f64,
    /// Latest histogram (MACD - signal)
    pub histogram: f64,
    /// Histogram shape at the last bar
    pub histogram_phase: HistogramPhase,
    /// Histogram size against the medium window
    pub strength: MacdStrength,
    /// Histogram trend per window
    pub trends: Vec<WindowTrend>,
    /// Signal-line and zero-line crossovers, and histogram/price
    /// divergences, per window
    pub events: Vec<SignalEvent>,
}

/// MACD calculator.
#[derive(Debug, Clone)]
pub struct MacdCalculator {
    config: MacdConfig,
}

impl MacdCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: MacdConfig) -> Self {
        Self { config }
    }

    fn indicator(&self) -> MACD {
        MACD::new(self.config.fast, self.config.slow, self.config.signal)
    }
}

impl Default for MacdCalculator {
    fn default() -> Self {
        Self::new(MacdConfig::default())
    }
}

impl WindowedIndicator for MacdCalculator {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        let MacdConfig { fast, slow, signal } = self.config;
        if fast == 0 || signal == 0 || fast >= slow {
            return Err(IndicatorError::invalid_params(format!(
                "MACD needs 0 < fast < slow and signal > 0, got {fast}/{slow}/{signal}"
            )));
        }
        Ok(())
    }

    /// One bar past the first defined histogram value, so the phase can be
    /// read from two bars.
    fn required_bars(&self) -> usize {
        self.indicator().warmup_periods() + 1
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let lines = self.indicator().compute_all(bars);

        let (Some(macd), Some(signal), Some(histogram)) = (
            last_finite(&lines.macd),
            last_finite(&lines.signal),
            last_finite(&lines.histogram),
        ) else {
            return Err(IndicatorError::non_finite(self.kind().as_str(), series.len()));
        };
        let previous = lines
            .histogram
            .len()
            .checked_sub(2)
            .and_then(|i| lines.histogram.get(i))
            .copied()
            .filter(|h| h.is_finite())
            .unwrap_or(0.0);

        let mut events = Vec::new();
        for window in windows.iter() {
            let scale = LineScale::Price(mean_close(window));
            events.extend(crossover_event(
                &lines.histogram,
                scale,
                window,
                bars,
                "MACD/signal",
                SignalKind::GoldenCross,
                SignalKind::DeathCross,
            ));
            events.extend(crossover_event(
                &lines.macd,
                scale,
                window,
                bars,
                "MACD/zero",
                SignalKind::ZeroCrossUp,
                SignalKind::ZeroCrossDown,
            ));
            events.extend(divergence_event(
                window,
                bars,
                &lines.histogram,
                scale,
                "MACD/price",
            ));
        }

        let trends = windows
            .iter()
            .filter_map(|window| {
                window_trend(
                    window,
                    &lines.histogram,
                    LineScale::Price(mean_close(window)),
                )
            })
            .collect();

        let medium = windows.get(WindowTag::Medium);
        let tolerance = LineScale::Price(mean_close(medium)).tolerance();
        let report = MacdReport {
            macd,
            signal,
            histogram,
            histogram_phase: phase(previous, histogram, tolerance),
            strength: strength(
                histogram,
                sample_std(medium.slice(&lines.histogram)),
                tolerance,
            ),
            trends,
            events,
        };

        debug!(
            histogram = report.histogram,
            phase = ?report.histogram_phase,
            events = report.events.len(),
            "MACD computed"
        );
        Ok(IndicatorReport::Macd(report))
    }
}

fn phase(previous: f64, current: f64, tolerance: f64) -> HistogramPhase {
    if current.abs() <= tolerance {
        HistogramPhase::Flat
    } else if current > 0.0 {
        if current > previous {
            HistogramPhase::PositiveExpanding
        } else {
            HistogramPhase::PositiveContracting
        }
    } else if current < previous {
        HistogramPhase::NegativeExpanding
    } else {
        HistogramPhase::NegativeContracting
    }
}

fn strength(histogram: f64, std: Option<f64>, tolerance: f64) -> MacdStrength {
    match std {
        Some(std) if std > tolerance => {
            let size = histogram.abs();
            if size > 2.0 * std {
                MacdStrength::Extreme
            } else if size > std {
                MacdStrength::Strong
            } else {
                MacdStrength::Normal
            }
        }
        _ => MacdStrength::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{flat_bars, geometric};
    use stockscope_types::WindowConfig;

    fn run(series: &PriceSeries) -> MacdReport {
        let windows = WindowSet::from_series(series, &WindowConfig::default());
        match MacdCalculator::default().analyze(series, &windows).unwrap() {
            IndicatorReport::Macd(report) => report,
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_constant_series_is_flat() {
        let report = run(&flat_bars(&[100.0; 60]));

        assert!(report.macd.abs() < 1e-9);
        assert!(report.histogram.abs() < 1e-9);
        assert_eq!(report.histogram_phase, HistogramPhase::Flat);
        assert_eq!(report.strength, MacdStrength::Normal);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_geometric_growth_positive_histogram() {
        let report = run(&flat_bars(&geometric(60)));

        assert!(report.macd > 0.0);
        assert!(report.histogram > 0.0);
        assert!(matches!(
            report.histogram_phase,
            HistogramPhase::PositiveExpanding | HistogramPhase::PositiveContracting
        ));
        assert!(
            !report
                .events
                .iter()
                .any(|e| e.kind == SignalKind::DeathCross)
        );
    }

    #[test]
    fn test_insufficient_below_slow_plus_signal() {
        let series = flat_bars(&geometric(34));
        let windows = WindowSet::from_series(&series, &WindowConfig::default());
        let err = MacdCalculator::default()
            .analyze(&series, &windows)
            .unwrap_err();
        assert_eq!(err.as_insufficient(), Some((35, 34)));
    }

    #[test]
    fn test_rally_after_decline_crosses_signal_line() {
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - 2.0 * f64::from(i)).collect();
        closes.extend((1..=10).map(|i| 102.0 + 6.0 * f64::from(i)));
        let report = run(&flat_bars(&closes));

        // The histogram sits at zero along the linear decline and turns
        // positive on the first rally bar, inside the medium window.
        assert!(report.events.iter().any(|e| e.subject == "MACD/signal"
            && e.kind == SignalKind::GoldenCross
            && e.window == WindowTag::Medium));
        assert!(report.histogram > 0.0);
    }

    #[test]
    fn test_slowing_rally_diverges_from_histogram() {
        // steady 3-point rally, then a 0.5-point crawl: price keeps rising
        // while the histogram falls from zero
        let mut closes: Vec<f64> = (0..46).map(|i| 100.0 + 3.0 * f64::from(i)).collect();
        closes.extend((1..=14).map(|i| 235.0 + 0.5 * f64::from(i)));
        let series = flat_bars(&closes);
        let report = run(&series);

        assert!(report.histogram < 0.0);
        assert!(report.events.iter().any(|e| e.subject == "MACD/price"
            && e.kind == SignalKind::BearishDivergence
            && e.window == WindowTag::Medium
            && e.date == series.bars()[59].date));
        assert!(
            !report
                .events
                .iter()
                .any(|e| e.kind == SignalKind::BullishDivergence)
        );
    }

    #[test]
    fn test_huge_prices_are_not_reported_as_missing_bars() {
        let series = flat_bars(&[1e307; 60]);
        let windows = WindowSet::from_series(&series, &WindowConfig::default());
        let err = MacdCalculator::default()
            .analyze(&series, &windows)
            .unwrap_err();

        assert!(err.as_insufficient().is_none());
        assert!(matches!(err, IndicatorError::NonFinite { bars: 60, .. }));
    }

    #[test]
    fn test_phase_classification() {
        let tol = 1e-9;
        assert_eq!(phase(0.5, 1.0, tol), HistogramPhase::PositiveExpanding);
        assert_eq!(phase(1.0, 0.5, tol), HistogramPhase::PositiveContracting);
        assert_eq!(phase(-0.5, -1.0, tol), HistogramPhase::NegativeExpanding);
        assert_eq!(phase(-1.0, -0.5, tol), HistogramPhase::NegativeContracting);
        assert_eq!(phase(1.0, 0.0, tol), HistogramPhase::Flat);
        assert_eq!(phase(2e-12, 1e-12, 1e-19), HistogramPhase::PositiveContracting);
    }

    #[test]
    fn test_strength_thresholds() {
        let tol = 1e-9;
        assert_eq!(strength(2.5, Some(1.0), tol), MacdStrength::Extreme);
        assert_eq!(strength(-1.5, Some(1.0), tol), MacdStrength::Strong);
        assert_eq!(strength(0.5, Some(1.0), tol), MacdStrength::Normal);
        assert_eq!(strength(3.0, None, tol), MacdStrength::Normal);
    }
}
