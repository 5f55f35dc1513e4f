//! Bollinger Bands calculator.
//!
//! A band with zero width (every close in the lookback equal) is degenerate:
//! it yields no breakout, touch or width events and no `percent_b`.

use stockscope_types::{Bias, BollConfig, PriceBar, PriceSeries};
use tracing::debug;

use crate::calculators::last_finite;
use crate::error::IndicatorError;
use crate::impl_::bollinger::BollingerBands;
use crate::report::{IndicatorKind, IndicatorReport, SignalEvent, SignalKind, WindowTrend};
use crate::signals::{LineScale, mean_close, window_trend, zone_event};
use crate::traits::{MultiOutputIndicator, WindowedIndicator};
use crate::window::{Window, WindowSet};

/// Bars used for the band-width trend.
const WIDTH_TREND_BARS: usize = 5;

/// Where the last close sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    /// Close above the upper band
    AboveUpper,
    /// Between middle and upper band
    UpperHalf,
    /// On the middle band
    AtMiddle,
    /// Between lower and middle band
    LowerHalf,
    /// Close below the lower band
    BelowLower,
}

/// Direction of the band width over the last five bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandwidthTrend {
    /// Width strictly increasing
    Widening,
    /// Width strictly decreasing
    Narrowing,
    /// Anything else
    Stable,
}

/// Bollinger Bands summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BollReport {
    /// Latest upper band
    pub upper: f64,
    /// Latest middle band (SMA)
    pub middle: f64,
    /// Latest lower band
    pub lower: f64,
    /// `(upper - lower) / middle * 100`, 0 when the middle band is 0
    pub bandwidth_pct: f64,
    /// `(close - lower) / (upper - lower)`, absent for a degenerate band
    pub percent_b: Option<f64>,
    /// Close relative to the bands
    pub position: BandPosition,
    /// Width direction over the last five bars
    pub bandwidth_trend: BandwidthTrend,
    /// Middle band trend per window
    pub trends: Vec<WindowTrend>,
    /// Band hits and width events per window
    pub events: Vec<SignalEvent>,
}

/// Bollinger Bands calculator.
#[derive(Debug, Clone)]
pub struct BollCalculator {
    config: BollConfig,
}

impl BollCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: BollConfig) -> Self {
        Self { config }
    }

    fn bands(&self) -> BollingerBands {
        BollingerBands::new(self.config.period, self.config.std_factor)
    }
}

impl Default for BollCalculator {
    fn default() -> Self {
        Self::new(BollConfig::default())
    }
}

impl WindowedIndicator for BollCalculator {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Boll
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        let BollConfig {
            period,
            std_factor,
            width_tolerance,
        } = self.config;
        if period < 2 {
            return Err(IndicatorError::invalid_params("BOLL period must be >= 2"));
        }
        if !(std_factor.is_finite() && std_factor > 0.0) {
            return Err(IndicatorError::param_out_of_range(
                "boll.std_factor",
                std_factor,
                0.0,
                f64::INFINITY,
            ));
        }
        if !(0.0..1.0).contains(&width_tolerance) {
            return Err(IndicatorError::param_out_of_range(
                "boll.width_tolerance",
                width_tolerance,
                0.0,
                1.0,
            ));
        }
        Ok(())
    }

    fn required_bars(&self) -> usize {
        self.bands().warmup_periods()
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let bands = self.bands().compute_all(bars);
        let widths = bands.widths();

        let (Some(upper), Some(middle), Some(lower), Some(width)) = (
            last_finite(&bands.upper),
            last_finite(&bands.middle),
            last_finite(&bands.lower),
            last_finite(&widths),
        ) else {
            return Err(IndicatorError::non_finite(self.kind().as_str(), series.len()));
        };
        let close = bars
            .last()
            .map(|b| b.close)
            .ok_or_else(|| IndicatorError::insufficient(self.required_bars(), 0))?;

        let live = |i: usize| widths[i].is_finite() && !is_degenerate(widths[i], bands.middle[i]);

        let mut events = Vec::new();
        for window in windows.iter() {
            events.extend(zone_event(
                window,
                bars,
                "close/upper",
                SignalKind::UpperBandBreakout,
                Bias::Bullish,
                |i| live(i) && bars[i].close > bands.upper[i],
            ));
            events.extend(zone_event(
                window,
                bars,
                "close/lower",
                SignalKind::LowerBandBreakout,
                Bias::Bearish,
                |i| live(i) && bars[i].close < bands.lower[i],
            ));
            events.extend(zone_event(
                window,
                bars,
                "high/upper",
                SignalKind::UpperBandTouch,
                Bias::Bearish,
                |i| live(i) && bars[i].high >= bands.upper[i] && bars[i].close <= bands.upper[i],
            ));
            events.extend(zone_event(
                window,
                bars,
                "low/lower",
                SignalKind::LowerBandTouch,
                Bias::Bullish,
                |i| live(i) && bars[i].low <= bands.lower[i] && bars[i].close >= bands.lower[i],
            ));
            if bars.len().checked_sub(1).is_some_and(live) {
                events.extend(width_event(window, bars, &widths, self.config.width_tolerance));
            }
        }

        let trends = windows
            .iter()
            .filter_map(|window| {
                window_trend(window, &bands.middle, LineScale::Price(mean_close(window)))
            })
            .collect();

        let degenerate = is_degenerate(width, middle);
        let report = BollReport {
            upper,
            middle,
            lower,
            bandwidth_pct: if middle.abs() > f64::MIN_POSITIVE {
                width / middle * 100.0
            } else {
                0.0
            },
            percent_b: (!degenerate).then(|| (close - lower) / width),
            position: position(close, upper, middle, lower),
            bandwidth_trend: bandwidth_trend(&widths, LineScale::Price(middle).tolerance()),
            trends,
            events,
        };

        debug!(
            width,
            position = ?report.position,
            events = report.events.len(),
            "BOLL computed"
        );
        Ok(IndicatorReport::Boll(report))
    }
}

/// Zero-width band, relative to the price level.
fn is_degenerate(width: f64, middle: f64) -> bool {
    width <= LineScale::Price(middle).tolerance()
}

/// Squeeze or expansion of the current width against the window average.
fn width_event(
    window: &Window<'_>,
    bars: &[PriceBar],
    widths: &[f64],
    tolerance: f64,
) -> Option<SignalEvent> {
    let in_window: Vec<f64> = window
        .slice(widths)
        .iter()
        .copied()
        .filter(|w| w.is_finite())
        .collect();
    let current = *in_window.last()?;
    let average = in_window.iter().sum::<f64>() / in_window.len() as f64;
    if average <= 0.0 {
        return None;
    }

    let kind = if current < average * (1.0 - tolerance) {
        SignalKind::Squeeze
    } else if current > average * (1.0 + tolerance) {
        SignalKind::Expansion
    } else {
        return None;
    };

    Some(SignalEvent {
        window: window.tag(),
        kind,
        bias: Bias::Neutral,
        subject: "width/average".to_string(),
        date: bars.last()?.date,
    })
}

fn position(close: f64, upper: f64, middle: f64, lower: f64) -> BandPosition {
    if close > upper {
        BandPosition::AboveUpper
    } else if close < lower {
        BandPosition::BelowLower
    } else if (close - middle).abs() <= LineScale::Price(middle).tolerance() {
        BandPosition::AtMiddle
    } else if close > middle {
        BandPosition::UpperHalf
    } else {
        BandPosition::LowerHalf
    }
}

fn bandwidth_trend(widths: &[f64], tolerance: f64) -> BandwidthTrend {
    let recent: Vec<f64> = widths
        .iter()
        .rev()
        .take(WIDTH_TREND_BARS)
        .rev()
        .copied()
        .filter(|w| w.is_finite())
        .collect();
    if recent.len() < 2 {
        return BandwidthTrend::Stable;
    }
    if recent.windows(2).all(|w| w[1] > w[0] + tolerance) {
        BandwidthTrend::Widening
    } else if recent.windows(2).all(|w| w[1] < w[0] - tolerance) {
        BandwidthTrend::Narrowing
    } else {
        BandwidthTrend::Stable
    }
}
