//! RSI calculator: Wilder RSI with zone hits and price divergence.

use stockscope_types::{Bias, PriceSeries, RsiConfig};
use tracing::debug;

use crate::calculators::last_finite;
use crate::error::IndicatorError;
use crate::impl_::rsi::rsi_values;
use crate::report::{IndicatorKind, IndicatorReport, SignalEvent, SignalKind, WindowTrend};
use crate::signals::{LineScale, divergence_event, window_trend, zone_event};
use crate::traits::WindowedIndicator;
use crate::window::WindowSet;

/// Latest RSI for one period.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RsiValue {
    /// Smoothing period
    pub period: usize,
    /// Value at the last bar, in [0, 100]
    pub value: f64,
}

/// RSI summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RsiReport {
    /// Primary period
    pub period: usize,
    /// Latest primary RSI, in [0, 100]
    pub value: f64,
    /// Additional periods with enough bars
    pub extra: Vec<RsiValue>,
    /// Primary RSI trend per window
    pub trends: Vec<WindowTrend>,
    /// Zone hits and divergences per window
    pub events: Vec<SignalEvent>,
}

/// RSI calculator.
#[derive(Debug, Clone)]
pub struct RsiCalculator {
    config: RsiConfig,
}

impl RsiCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: RsiConfig) -> Self {
        Self { config }
    }
}

impl Default for RsiCalculator {
    fn default() -> Self {
        Self::new(RsiConfig::default())
    }
}

impl WindowedIndicator for RsiCalculator {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        let period = self.config.period;
        if period < 2 {
            return Err(IndicatorError::param_out_of_range(
                "rsi.period",
                period as f64,
                2.0,
                f64::INFINITY,
            ));
        }
        Ok(())
    }

    fn required_bars(&self) -> usize {
        self.config.period + 1
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let closes = series.closes();
        let rsi = rsi_values(&closes, self.config.period);
        let value = last_finite(&rsi)
            .ok_or_else(|| IndicatorError::non_finite(self.kind().as_str(), series.len()))?;

        let extra = self
            .config
            .extra_periods
            .iter()
            .filter(|&&period| period != self.config.period)
            .filter_map(|&period| {
                last_finite(&rsi_values(&closes, period)).map(|value| RsiValue { period, value })
            })
            .collect();

        let subject = format!("RSI{}", self.config.period);
        let divergence_subject = format!("{subject}/price");
        let overbought = self.config.overbought;
        let oversold = self.config.oversold;

        let mut events = Vec::new();
        for window in windows.iter() {
            events.extend(zone_event(
                window,
                bars,
                &subject,
                SignalKind::Overbought,
                Bias::Bearish,
                |i| rsi[i] > overbought,
            ));
            events.extend(zone_event(
                window,
                bars,
                &subject,
                SignalKind::Oversold,
                Bias::Bullish,
                |i| rsi[i] < oversold,
            ));
            events.extend(divergence_event(
                window,
                bars,
                &rsi,
                LineScale::Oscillator,
                &divergence_subject,
            ));
        }

        let trends = windows
            .iter()
            .filter_map(|window| window_trend(window, &rsi, LineScale::Oscillator))
            .collect();

        let report = RsiReport {
            period: self.config.period,
            value,
            extra,
            trends,
            events,
        };

        debug!(value, events = report.events.len(), "RSI computed");
        Ok(IndicatorReport::Rsi(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{flat_bars, geometric};
    use approx::assert_relative_eq;
    use stockscope_types::{WindowConfig, WindowTag};

    fn run(series: &PriceSeries) -> RsiReport {
        let windows = WindowSet::from_series(series, &WindowConfig::default());
        match RsiCalculator::default().analyze(series, &windows).unwrap() {
            IndicatorReport::Rsi(report) => report,
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_constant_series_neutral() {
        let report = run(&flat_bars(&[100.0; 60]));

        assert_relative_eq!(report.value, 50.0);
        assert!(report.events.is_empty());
        assert_eq!(report.extra.len(), 3);
        assert!(report.extra.iter().all(|r| (r.value - 50.0).abs() < 1e-10));
    }

    #[test]
    fn test_rising_series_near_hundred() {
        let report = run(&flat_bars(&geometric(60)));

        assert_relative_eq!(report.value, 100.0);
        assert!(
            report
                .events
                .iter()
                .any(|e| e.kind == SignalKind::Overbought && e.window == WindowTag::Long)
        );
        assert!(
            !report
                .events
                .iter()
                .any(|e| e.kind == SignalKind::BearishDivergence)
        );
    }

    #[test]
    fn test_extra_periods_need_their_own_bars() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + f64::from(i % 3)).collect();
        let report = run(&flat_bars(&closes));

        let periods: Vec<usize> = report.extra.iter().map(|r| r.period).collect();
        assert_eq!(periods, vec![6, 12]);
    }

    #[test]
    fn test_insufficient_below_period_plus_one() {
        let series = flat_bars(&[100.0; 14]);
        let windows = WindowSet::from_series(&series, &WindowConfig::default());
        let err = RsiCalculator::default()
            .analyze(&series, &windows)
            .unwrap_err();
        assert_eq!(err.as_insufficient(), Some((15, 14)));
    }

    #[test]
    fn test_bearish_divergence_on_fading_rally() {
        // Strong rally, then a slow grind higher with frequent pullbacks:
        // price ends higher while RSI cools off.
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + 3.0 * f64::from(i)).collect();
        let mut price = 187.0;
        for i in 0..10 {
            price += if i % 2 == 0 { 1.5 } else { -1.0 };
            closes.push(price);
        }
        let report = run(&flat_bars(&closes));

        assert!(report.events.iter().any(|e| e.kind
            == SignalKind::BearishDivergence
            && e.window == WindowTag::Short
            && e.subject == "RSI14/price"));
    }
}
