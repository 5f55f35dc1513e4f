//! Window-level signal helpers shared by the calculators: sign-change
//! crossovers, zone hits, endpoint divergences and least-squares trends.

use stockscope_types::{Bias, PriceBar};

use crate::report::{Direction, SignalEvent, SignalKind, WindowTrend};
use crate::window::Window;

/// Relative tolerance: differences below `CROSS_EPSILON` times the line's
/// scale count as zero.
pub const CROSS_EPSILON: f64 = 1e-9;

/// Normalized slope (per bar, relative to mean price) below which a
/// price-denominated line is flat.
pub const PRICE_FLAT_SLOPE: f64 = 1e-3;

/// Slope (points per bar) below which a 0-100 oscillator is flat.
pub const OSCILLATOR_FLAT_SLOPE: f64 = 0.1;

/// Magnitude a line is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineScale {
    /// Price-denominated line (MA spreads, MACD); the value is the price
    /// level, usually the window's mean close
    Price(f64),
    /// Bounded 0-100 oscillator (RSI, K, D)
    Oscillator,
}

impl LineScale {
    /// Absolute difference below which a value of the line counts as zero.
    #[must_use]
    pub fn tolerance(self) -> f64 {
        match self {
            LineScale::Price(level) => CROSS_EPSILON * level.abs().max(f64::MIN_POSITIVE),
            LineScale::Oscillator => CROSS_EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Negative,
    Zero,
    Positive,
}

fn sign_of(value: f64, tolerance: f64) -> Sign {
    if value > tolerance {
        Sign::Positive
    } else if value < -tolerance {
        Sign::Negative
    } else {
        Sign::Zero
    }
}

/// A sign change of a difference series inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    /// Bullish for a move to positive, bearish for a move to negative
    pub bias: Bias,
    /// Series index of the bar where the final sign was reached
    pub index: usize,
}

/// Compares the sign of `diff` at the window's first defined bar with its
/// sign at the window's last bar.
///
/// `diff` is series-aligned (e.g. fast MA minus slow MA). A move from
/// negative or zero to positive is bullish, from positive or zero to
/// negative bearish; anything else is no crossing. Values within
/// `scale.tolerance()` of zero count as zero.
#[must_use]
pub fn find_crossing(diff: &[f64], window: &Window<'_>, scale: LineScale) -> Option<Crossing> {
    let range = window.range();
    let last = range.end.checked_sub(1)?;
    let first = range
        .clone()
        .find(|&i| diff.get(i).is_some_and(|v| v.is_finite()))?;
    let last_value = *diff.get(last)?;
    if first >= last || !last_value.is_finite() {
        return None;
    }

    let tolerance = scale.tolerance();
    let to = sign_of(last_value, tolerance);
    let bias = match (sign_of(diff[first], tolerance), to) {
        (Sign::Negative | Sign::Zero, Sign::Positive) => Bias::Bullish,
        (Sign::Positive | Sign::Zero, Sign::Negative) => Bias::Bearish,
        _ => return None,
    };

    let index = (first + 1..=last)
        .rev()
        .find(|&i| sign_of(diff[i], tolerance) == to && sign_of(diff[i - 1], tolerance) != to)
        .unwrap_or(last);

    Some(Crossing { bias, index })
}

/// Builds a crossover event for `subject` when `diff` changes sign in
/// `window`.
#[must_use]
pub fn crossover_event(
    diff: &[f64],
    scale: LineScale,
    window: &Window<'_>,
    bars: &[PriceBar],
    subject: &str,
    up: SignalKind,
    down: SignalKind,
) -> Option<SignalEvent> {
    let crossing = find_crossing(diff, window, scale)?;
    let kind = match crossing.bias {
        Bias::Bullish => up,
        _ => down,
    };
    Some(SignalEvent {
        window: window.tag(),
        kind,
        bias: crossing.bias,
        subject: subject.to_string(),
        date: bars.get(crossing.index)?.date,
    })
}

/// Most recent series index inside `window` for which `hit` holds.
#[must_use]
pub fn last_hit(window: &Window<'_>, hit: impl Fn(usize) -> bool) -> Option<usize> {
    window.range().rev().find(|&i| hit(i))
}

/// Builds a zone event (overbought, oversold, band hits) at the most recent
/// bar of `window` satisfying `hit`.
#[must_use]
pub fn zone_event(
    window: &Window<'_>,
    bars: &[PriceBar],
    subject: &str,
    kind: SignalKind,
    bias: Bias,
    hit: impl Fn(usize) -> bool,
) -> Option<SignalEvent> {
    let index = last_hit(window, hit)?;
    Some(SignalEvent {
        window: window.tag(),
        kind,
        bias,
        subject: subject.to_string(),
        date: bars.get(index)?.date,
    })
}

/// Price and `line` moving in opposite directions between the window's
/// endpoints: the first bar where `line` is defined and the last bar.
///
/// Higher close with a lower line is a bearish divergence, lower close with
/// a higher line a bullish one. The event is dated at the last bar.
#[must_use]
pub fn divergence_event(
    window: &Window<'_>,
    bars: &[PriceBar],
    line: &[f64],
    scale: LineScale,
    subject: &str,
) -> Option<SignalEvent> {
    let range = window.range();
    let last = range.end.checked_sub(1)?;
    let first = range
        .clone()
        .find(|&i| line.get(i).is_some_and(|v| v.is_finite()))?;
    let end_value = *line.get(last)?;
    if first >= last || !end_value.is_finite() {
        return None;
    }

    let start_close = bars.get(first)?.close;
    let end_bar = bars.get(last)?;
    let price_change = end_bar.close - start_close;
    let price_tolerance = LineScale::Price(start_close).tolerance();
    let line_change = end_value - line[first];
    let line_tolerance = scale.tolerance();

    let (kind, bias) = if price_change > price_tolerance && line_change < -line_tolerance {
        (SignalKind::BearishDivergence, Bias::Bearish)
    } else if price_change < -price_tolerance && line_change > line_tolerance {
        (SignalKind::BullishDivergence, Bias::Bullish)
    } else {
        return None;
    };

    Some(SignalEvent {
        window: window.tag(),
        kind,
        bias,
        subject: subject.to_string(),
        date: end_bar.date,
    })
}

/// Least-squares slope of the finite values against their position.
///
/// Needs at least two finite values.
#[must_use]
pub fn least_squares_slope(values: &[f64]) -> Option<f64> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64, *v))
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), (x, y)| {
        let dx = x - mean_x;
        (num + dx * (y - mean_y), den + dx * dx)
    });
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

/// Fits a trend to the window's part of a series-aligned vector.
///
/// A price-denominated slope is divided by the price level before it is
/// compared with [`PRICE_FLAT_SLOPE`].
#[must_use]
pub fn window_trend(window: &Window<'_>, values: &[f64], scale: LineScale) -> Option<WindowTrend> {
    let slope = least_squares_slope(window.slice(values))?;
    let (judged, threshold) = match scale {
        LineScale::Price(level) if level.abs() > f64::MIN_POSITIVE => {
            (slope / level.abs(), PRICE_FLAT_SLOPE)
        }
        LineScale::Price(_) => (slope, PRICE_FLAT_SLOPE),
        LineScale::Oscillator => (slope, OSCILLATOR_FLAT_SLOPE),
    };
    let direction = if judged.abs() < threshold {
        Direction::Flat
    } else if judged > 0.0 {
        Direction::Rising
    } else {
        Direction::Falling
    };
    Some(WindowTrend {
        window: window.tag(),
        direction,
        slope,
    })
}

/// Mean close inside the window (0 for an empty window).
#[must_use]
pub fn mean_close(window: &Window<'_>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.bars().iter().map(|b| b.close).sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (n - 1) of the finite values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
