//! Moving-average system: SMA ladder, crossovers, alignment and support.

use stockscope_types::{Bias, MaConfig, PriceBar, PriceSeries};
use tracing::debug;

use crate::calculators::last_finite;
use crate::error::IndicatorError;
use crate::impl_::sma::sma_values;
use crate::report::{IndicatorKind, IndicatorReport, SignalEvent, SignalKind, WindowTrend};
use crate::signals::{LineScale, crossover_event, mean_close, window_trend};
use crate::traits::WindowedIndicator;
use crate::window::WindowSet;

/// Number of shortest moving averages the close deviation, turning points
/// and convergence zone are measured on.
const SHORT_MAS: usize = 3;

/// Latest values read for a turning point (four slopes, three changes).
const TURN_BARS: usize = 5;

/// Population std / mean of the short MAs below which they form a
/// convergence zone.
const CONVERGENCE_DISPERSION: f64 = 0.01;

/// Volume ratio to the previous bar that confirms a breakout.
const BREAKOUT_VOLUME_RATIO: f64 = 1.5;

/// Volume ratio above which a breakout is strong.
const STRONG_VOLUME_RATIO: f64 = 2.0;

/// Latest value of one moving average.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaValue {
    /// SMA period
    pub period: usize,
    /// Value at the last bar
    pub value: f64,
}

/// Ordering of the moving-average ladder at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaAlignment {
    /// Every MA above the next longer one
    Bullish,
    /// Every MA below the next longer one
    Bearish,
    /// Anything else
    Mixed,
}

/// Deviation of the close from the shortest moving averages.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaDeviation {
    /// Mean of `(close - MA) / MA * 100`
    pub average_pct: f64,
    /// Largest absolute deviation
    pub max_abs_pct: f64,
    /// `max_abs_pct` above the configured threshold
    pub overextended: bool,
}

/// Slope change of one moving average over its latest bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaTurnKind {
    /// Rising, and rising faster
    AcceleratingRise,
    /// Rising, but slower
    RiseEasing,
    /// Falling, and falling faster
    AcceleratingDecline,
    /// Falling, but slower
    DeclineEasing,
    /// Slope or its change is zero
    Steady,
}

/// Turning-point reading of one moving average.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaTurn {
    /// SMA period
    pub period: usize,
    /// Classification
    pub kind: MaTurnKind,
    /// Last one-bar change of the MA
    pub slope: f64,
    /// Last change of that slope
    pub slope_change: f64,
}

/// Volume-confirmed move out of a convergence zone on the last bar.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaBreakout {
    /// Bullish for an up move, bearish for a down move
    pub bias: Bias,
    /// Volume more than doubled
    pub strong: bool,
    /// Close change against the previous close, in percent
    pub price_change_pct: f64,
    /// Volume over the previous bar's volume
    pub volume_ratio: f64,
}

/// Dispersion of the short moving averages and any breakout from them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaConvergence {
    /// Population std of the short MAs over their mean, in percent
    pub dispersion_pct: f64,
    /// `dispersion_pct` below one percent
    pub converged: bool,
    /// Present only for a converged zone
    pub breakout: Option<MaBreakout>,
}

/// Moving-average system summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaReport {
    /// Last close
    pub close: f64,
    /// Latest value of every period with enough bars, shortest first
    pub values: Vec<MaValue>,
    /// Ladder ordering
    pub alignment: MaAlignment,
    /// Nearest MA below the close
    pub support: Option<MaValue>,
    /// Nearest MA at or above the close
    pub resistance: Option<MaValue>,
    /// Close deviation from the shortest MAs
    pub deviation: Option<MaDeviation>,
    /// Turning points of the shortest MAs with enough history
    pub turning_points: Vec<MaTurn>,
    /// Convergence zone of the shortest MAs, when three are available
    pub convergence: Option<MaConvergence>,
    /// Trend of the shortest MA per window
    pub trends: Vec<WindowTrend>,
    /// Crossovers of adjacent periods per window
    pub events: Vec<SignalEvent>,
}

/// Moving-average system calculator.
#[derive(Debug, Clone)]
pub struct MaSystem {
    config: MaConfig,
}

impl MaSystem {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: MaConfig) -> Self {
        Self { config }
    }

    /// Configured periods.
    #[must_use]
    pub fn periods(&self) -> &[usize] {
        &self.config.periods
    }
}

impl Default for MaSystem {
    fn default() -> Self {
        Self::new(MaConfig::default())
    }
}

impl WindowedIndicator for MaSystem {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ma
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        if self.config.periods.is_empty() || self.config.periods.contains(&0) {
            return Err(IndicatorError::invalid_params(
                "MA periods must be non-empty and positive",
            ));
        }
        Ok(())
    }

    fn required_bars(&self) -> usize {
        self.config.periods.iter().copied().min().unwrap_or(1)
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let closes = series.closes();
        let close = closes
            .last()
            .copied()
            .ok_or_else(|| IndicatorError::insufficient(self.required_bars(), 0))?;

        // (period, full SMA line) for every period with enough bars
        let mut lines: Vec<(usize, Vec<f64>)> = self
            .config
            .periods
            .iter()
            .filter(|&&period| period <= closes.len())
            .map(|&period| (period, sma_values(&closes, period)))
            .collect();
        lines.sort_by_key(|(period, _)| *period);

        let values = lines
            .iter()
            .map(|(period, line)| {
                last_finite(line).map(|value| MaValue {
                    period: *period,
                    value,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| IndicatorError::non_finite(self.kind().as_str(), series.len()))?;

        let mut events = Vec::new();
        for pair in lines.windows(2) {
            let (fast_period, fast) = &pair[0];
            let (slow_period, slow) = &pair[1];
            let diff: Vec<f64> = fast.iter().zip(slow).map(|(f, s)| f - s).collect();
            let subject = format!("MA{fast_period}/MA{slow_period}");
            events.extend(windows.iter().filter_map(|window| {
                crossover_event(
                    &diff,
                    LineScale::Price(mean_close(window)),
                    window,
                    bars,
                    &subject,
                    SignalKind::GoldenCross,
                    SignalKind::DeathCross,
                )
            }));
        }

        let trends = lines
            .first()
            .map(|(_, shortest)| {
                windows
                    .iter()
                    .filter_map(|window| {
                        window_trend(window, shortest, LineScale::Price(mean_close(window)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let report = MaReport {
            close,
            alignment: alignment(&values),
            support: support(&values, close),
            resistance: resistance(&values, close),
            deviation: deviation(&values, close, self.config.overextension_pct),
            turning_points: lines
                .iter()
                .take(SHORT_MAS)
                .filter_map(|(period, line)| turning_point(*period, line, close))
                .collect(),
            convergence: convergence(&values, bars),
            values,
            trends,
            events,
        };

        debug!(
            periods = report.values.len(),
            events = report.events.len(),
            alignment = ?report.alignment,
            "MA system computed"
        );
        Ok(IndicatorReport::Ma(report))
    }
}

fn alignment(values: &[MaValue]) -> MaAlignment {
    if values.len() < 2 {
        return MaAlignment::Mixed;
    }
    if values.windows(2).all(|w| w[0].value > w[1].value) {
        MaAlignment::Bullish
    } else if values.windows(2).all(|w| w[0].value < w[1].value) {
        MaAlignment::Bearish
    } else {
        MaAlignment::Mixed
    }
}

fn support(values: &[MaValue], close: f64) -> Option<MaValue> {
    values
        .iter()
        .filter(|ma| ma.value < close)
        .min_by(|a, b| (close - a.value).total_cmp(&(close - b.value)))
        .copied()
}

fn resistance(values: &[MaValue], close: f64) -> Option<MaValue> {
    values
        .iter()
        .filter(|ma| ma.value >= close)
        .min_by(|a, b| (a.value - close).total_cmp(&(b.value - close)))
        .copied()
}

fn deviation(values: &[MaValue], close: f64, threshold_pct: f64) -> Option<MaDeviation> {
    let deviations: Vec<f64> = values
        .iter()
        .take(SHORT_MAS)
        .filter(|ma| ma.value != 0.0)
        .map(|ma| (close - ma.value) / ma.value * 100.0)
        .collect();
    if deviations.is_empty() {
        return None;
    }

    let average_pct = deviations.iter().sum::<f64>() / deviations.len() as f64;
    let max_abs_pct = deviations.iter().map(|d| d.abs()).fold(0.0, f64::max);
    Some(MaDeviation {
        average_pct,
        max_abs_pct,
        overextended: max_abs_pct > threshold_pct,
    })
}

fn turning_point(period: usize, line: &[f64], close: f64) -> Option<MaTurn> {
    let recent = line.get(line.len().checked_sub(TURN_BARS)?..)?;
    if !recent.iter().all(|v| v.is_finite()) {
        return None;
    }
    let slopes: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();
    let slope = *slopes.last()?;
    let slope_change = slope - slopes[slopes.len() - 2];

    Some(MaTurn {
        period,
        kind: turn_kind(slope, slope_change, LineScale::Price(close).tolerance()),
        slope,
        slope_change,
    })
}

fn turn_kind(slope: f64, slope_change: f64, tolerance: f64) -> MaTurnKind {
    let rising = slope > tolerance;
    let falling = slope < -tolerance;
    if slope_change > tolerance && rising {
        MaTurnKind::AcceleratingRise
    } else if slope_change > tolerance && falling {
        MaTurnKind::DeclineEasing
    } else if slope_change < -tolerance && rising {
        MaTurnKind::RiseEasing
    } else if slope_change < -tolerance && falling {
        MaTurnKind::AcceleratingDecline
    } else {
        MaTurnKind::Steady
    }
}

fn convergence(values: &[MaValue], bars: &[PriceBar]) -> Option<MaConvergence> {
    let short: Vec<f64> = values.iter().take(SHORT_MAS).map(|ma| ma.value).collect();
    if short.len() < SHORT_MAS {
        return None;
    }
    let n = short.len() as f64;
    let mean = short.iter().sum::<f64>() / n;
    if mean.abs() <= f64::MIN_POSITIVE {
        return None;
    }
    let std = (short.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let dispersion = std / mean.abs();
    let converged = dispersion < CONVERGENCE_DISPERSION;

    Some(MaConvergence {
        dispersion_pct: dispersion * 100.0,
        converged,
        breakout: if converged { breakout(bars) } else { None },
    })
}

/// Last-bar close move with volume above [`BREAKOUT_VOLUME_RATIO`] times
/// the previous bar's.
fn breakout(bars: &[PriceBar]) -> Option<MaBreakout> {
    let [.., prev, last] = bars else {
        return None;
    };
    if prev.volume <= 0.0 || prev.close.abs() <= f64::MIN_POSITIVE {
        return None;
    }
    let volume_ratio = last.volume / prev.volume;
    let price_change = last.close - prev.close;
    let tolerance = LineScale::Price(prev.close).tolerance();
    if volume_ratio <= BREAKOUT_VOLUME_RATIO || price_change.abs() <= tolerance {
        return None;
    }

    Some(MaBreakout {
        bias: if price_change > 0.0 {
            Bias::Bullish
        } else {
            Bias::Bearish
        },
        strong: volume_ratio > STRONG_VOLUME_RATIO,
        price_change_pct: price_change / prev.close * 100.0,
        volume_ratio,
    })
}
