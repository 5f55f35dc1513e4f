//! KDJ calculator

use stockscope_types::{Bias, KdjConfig, PriceSeries, WindowTag};
use tracing::debug;

use crate::calculators::last_finite;
use crate::error::IndicatorError;
use crate::impl_::kdj::KDJ;
use crate::report::{IndicatorKind, IndicatorReport, SignalEvent, SignalKind, WindowTrend};
use crate::signals::{
    LineScale, crossover_event, divergence_event, sample_std, window_trend, zone_event,
};
use crate::traits::{MultiOutputIndicator, WindowedIndicator};
use crate::window::WindowSet;

/// |K - D| below which the lines count as converging.
const CONVERGENCE_GAP: f64 = 2.0;

/// Ordering of the three KDJ lines at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdjArrangement {
    /// J > K > D
    Bullish,
    /// J < K < D
    Bearish,
    /// K and D within two points
    Converging,
    /// Anything else
    Diverging,
}

/// How far the latest K, D and J sit from their medium-window means,
/// in sample standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdjStrength {
    /// Average deviation above 2
    Extreme,
    /// Above 1.5
    Strong,
    /// Above 1
    Moderate,
    /// Anything else, including lines without dispersion
    Weak,
}

/// KDJ summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KdjReport {
    /// Latest K, in [0, 100]
    pub k: f64,
    /// Latest D, in [0, 100]
    pub d: f64,
    /// Latest J, unclamped
    pub j: f64,
    /// Line ordering
    pub arrangement: KdjArrangement,
    /// Mean deviation of K, D and J from their medium-window means, in
    /// standard deviations; absent when a line is flat over the window
    pub deviation: Option<f64>,
    /// Bucketed `deviation`
    pub strength: KdjStrength,
    /// K trend per window
    pub trends: Vec<WindowTrend>,
    /// Zone hits, K/D crossovers and K/price divergences per window
    pub events: Vec<SignalEvent>,
}

/// KDJ calculator.
#[derive(Debug, Clone)]
pub struct KdjCalculator {
    config: KdjConfig,
}

impl KdjCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: KdjConfig) -> Self {
        Self { config }
    }

    fn indicator(&self) -> KDJ {
        KDJ::new(self.config.period)
    }
}

impl Default for KdjCalculator {
    fn default() -> Self {
        Self::new(KdjConfig::default())
    }
}

impl WindowedIndicator for KdjCalculator {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Kdj
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        if self.config.period == 0 {
            return Err(IndicatorError::invalid_params("KDJ period must be > 0"));
        }
        Ok(())
    }

    fn required_bars(&self) -> usize {
        self.indicator().warmup_periods()
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let lines = self.indicator().compute_all(bars);

        let (Some(k), Some(d), Some(j)) = (
            last_finite(&lines.k),
            last_finite(&lines.d),
            last_finite(&lines.j),
        ) else {
            return Err(IndicatorError::non_finite(self.kind().as_str(), series.len()));
        };

        let overbought = self.config.overbought;
        let oversold = self.config.oversold;
        let diff: Vec<f64> = lines.k.iter().zip(&lines.d).map(|(k, d)| k - d).collect();

        let mut events = Vec::new();
        for window in windows.iter() {
            events.extend(zone_event(
                window,
                bars,
                "K/D",
                SignalKind::Overbought,
                Bias::Bearish,
                |i| lines.k[i] > overbought && lines.d[i] > overbought,
            ));
            events.extend(zone_event(
                window,
                bars,
                "K/D",
                SignalKind::Oversold,
                Bias::Bullish,
                |i| lines.k[i] < oversold && lines.d[i] < oversold,
            ));
            events.extend(crossover_event(
                &diff,
                LineScale::Oscillator,
                window,
                bars,
                "K/D",
                SignalKind::GoldenCross,
                SignalKind::DeathCross,
            ));
            events.extend(divergence_event(
                window,
                bars,
                &lines.k,
                LineScale::Oscillator,
                "K/price",
            ));
        }

        let trends = windows
            .iter()
            .filter_map(|window| window_trend(window, &lines.k, LineScale::Oscillator))
            .collect();

        let medium = windows.get(WindowTag::Medium);
        let score = deviation(&[
            medium.slice(&lines.k),
            medium.slice(&lines.d),
            medium.slice(&lines.j),
        ]);
        let report = KdjReport {
            k,
            d,
            j,
            arrangement: arrangement(k, d, j),
            deviation: score,
            strength: score.map_or(KdjStrength::Weak, strength),
            trends,
            events,
        };

        debug!(k, d, j, events = report.events.len(), "KDJ computed");
        Ok(IndicatorReport::Kdj(report))
    }
}

fn arrangement(k: f64, d: f64, j: f64) -> KdjArrangement {
    if j > k && k > d {
        KdjArrangement::Bullish
    } else if j < k && k < d {
        KdjArrangement::Bearish
    } else if (k - d).abs() < CONVERGENCE_GAP {
        KdjArrangement::Converging
    } else {
        KdjArrangement::Diverging
    }
}

/// Average of `|last - mean| / std` over the given lines.
fn deviation(lines: &[&[f64]]) -> Option<f64> {
    let mut total = 0.0;
    for line in lines {
        let finite: Vec<f64> = line.iter().copied().filter(|v| v.is_finite()).collect();
        let last = *finite.last()?;
        let std = sample_std(&finite).filter(|s| *s > LineScale::Oscillator.tolerance())?;
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        total += (last - mean).abs() / std;
    }
    (!lines.is_empty()).then(|| total / lines.len() as f64)
}

fn strength(deviation: f64) -> KdjStrength {
    if deviation > 2.0 {
        KdjStrength::Extreme
    } else if deviation > 1.5 {
        KdjStrength::Strong
    } else if deviation > 1.0 {
        KdjStrength::Moderate
    } else {
        KdjStrength::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{flat_bars, ranged_bars};
    use stockscope_types::WindowConfig;

    fn run(series: &PriceSeries) -> KdjReport {
        let windows = WindowSet::from_series(series, &WindowConfig::default());
        match KdjCalculator::default().analyze(series, &windows).unwrap() {
            IndicatorReport::Kdj(report) => report,
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_flat_series_stays_at_seed() {
        let report = run(&flat_bars(&[100.0; 60]));

        assert!((report.k - 50.0).abs() < 1e-10);
        assert!((report.d - 50.0).abs() < 1e-10);
        assert!((report.j - 50.0).abs() < 1e-10);
        assert_eq!(report.arrangement, KdjArrangement::Converging);
        assert!(report.deviation.is_none());
        assert_eq!(report.strength, KdjStrength::Weak);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_steady_rise_is_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i)).collect();
        let report = run(&ranged_bars(&closes));

        assert!(report.k > 80.0 && report.d > 80.0);
        assert!(report.k <= 100.0 && report.d <= 100.0);
        assert!(
            report
                .events
                .iter()
                .any(|e| e.kind == SignalKind::Overbought && e.window == WindowTag::Short)
        );
    }

    #[test]
    fn test_turn_down_crosses_k_below_d() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        closes.extend((1..=10).map(|i| 129.0 - 3.0 * f64::from(i)));
        let series = ranged_bars(&closes);
        let report = run(&series);

        assert!(report.k < report.d);
        assert!(report.events.iter().any(|e| e.kind == SignalKind::DeathCross
            && e.subject == "K/D"
            && e.window == WindowTag::Medium
            && e.date == series.bars()[30].date));
    }

    #[test]
    fn test_insufficient_below_period() {
        let series = flat_bars(&[1.0; 8]);
        let windows = WindowSet::from_series(&series, &WindowConfig::default());
        let err = KdjCalculator::default()
            .analyze(&series, &windows)
            .unwrap_err();
        assert_eq!(err.as_insufficient(), Some((9, 8)));
    }

    #[test]
    fn test_fading_rally_diverges_from_k() {
        // fast rally, then a choppy crawl: closes still rise while K leaves
        // the top of the range
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + 3.0 * f64::from(i)).collect();
        let mut price = 187.0;
        for i in 0..10 {
            price += if i % 2 == 0 { 1.5 } else { -1.0 };
            closes.push(price);
        }
        let series = flat_bars(&closes);
        let report = run(&series);

        assert!(report.events.iter().any(|e| e.kind == SignalKind::BearishDivergence
            && e.subject == "K/price"
            && e.window == WindowTag::Short
            && e.date == series.bars()[39].date));
    }

    #[test]
    fn test_deviation_strength() {
        // 19 bars at 50 and one at 90: mean 52, sample std sqrt(80)
        let mut line = vec![50.0; 19];
        line.push(90.0);
        let expected = 38.0 / 80.0_f64.sqrt();

        let line = line.as_slice();
        let score = deviation(&[line, line, line]).unwrap();
        assert!((score - expected).abs() < 1e-10);
        assert_eq!(strength(score), KdjStrength::Extreme);
        assert!(deviation(&[line, &[50.0; 20][..]]).is_none());

        assert_eq!(strength(1.8), KdjStrength::Strong);
        assert_eq!(strength(1.2), KdjStrength::Moderate);
        assert_eq!(strength(0.4), KdjStrength::Weak);
    }

    #[test]
    fn test_arrangement_order() {
        assert_eq!(arrangement(70.0, 60.0, 90.0), KdjArrangement::Bullish);
        assert_eq!(arrangement(30.0, 40.0, 10.0), KdjArrangement::Bearish);
        assert_eq!(arrangement(50.0, 51.0, 60.0), KdjArrangement::Converging);
        assert_eq!(arrangement(50.0, 60.0, 70.0), KdjArrangement::Diverging);
    }
}
