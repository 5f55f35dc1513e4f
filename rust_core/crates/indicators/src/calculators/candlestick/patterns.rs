//! Candlestick pattern catalog.
//!
//! Single-bar shapes are all reported when they match. For spans of two to
//! five bars only the highest-priority match of that span is kept; ties go
//! to the pattern listed first in the catalog.

use std::cmp::Reverse;

use stockscope_types::{Bias, PriceBar};

/// Relative tolerance for "equal" highs and lows, as a share of the first
/// bar's range.
const LEVEL_TOLERANCE: f64 = 0.001;

/// A recognized candlestick formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    // one bar
    Doji,
    LongLeggedDoji,
    GravestoneDoji,
    SpinningTop,
    Hammer,
    InvertedHammer,
    HangingMan,
    ShootingStar,
    // two bars
    BullishEngulfing,
    BearishEngulfing,
    BullishHarami,
    BearishHarami,
    PiercingLine,
    DarkCloudCover,
    TweezerBottom,
    TweezerTop,
    GapUp,
    GapDown,
    FlatTop,
    FlatBottom,
    // three bars
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
    ThreeInsideUp,
    ThreeInsideDown,
    ThreeOutsideUp,
    ThreeOutsideDown,
    ThreeMountains,
    ThreeRivers,
    ThreeStars,
    BullishIslandReversal,
    BearishIslandReversal,
    // four bars
    BullishThreeLineStrike,
    BearishThreeLineStrike,
    // five bars
    RisingThreeMethods,
    FallingThreeMethods,
}

impl CandlePattern {
    /// Number of bars the pattern covers; also its weight in the strength
    /// score.
    #[must_use]
    pub fn span(self) -> usize {
        use CandlePattern::*;
        match self {
            Doji | LongLeggedDoji | GravestoneDoji | SpinningTop | Hammer | InvertedHammer
            | HangingMan | ShootingStar => 1,
            BullishEngulfing | BearishEngulfing | BullishHarami | BearishHarami | PiercingLine
            | DarkCloudCover | TweezerBottom | TweezerTop | GapUp | GapDown | FlatTop
            | FlatBottom => 2,
            MorningStar | EveningStar | ThreeWhiteSoldiers | ThreeBlackCrows | ThreeInsideUp
            | ThreeInsideDown | ThreeOutsideUp | ThreeOutsideDown | ThreeMountains
            | ThreeRivers | ThreeStars | BullishIslandReversal | BearishIslandReversal => 3,
            BullishThreeLineStrike | BearishThreeLineStrike => 4,
            RisingThreeMethods | FallingThreeMethods => 5,
        }
    }

    /// Directional reading.
    #[must_use]
    pub fn bias(self) -> Bias {
        use CandlePattern::*;
        match self {
            Doji | LongLeggedDoji | SpinningTop => Bias::Neutral,
            Hammer | InvertedHammer | BullishEngulfing | BullishHarami | PiercingLine
            | TweezerBottom | GapUp | FlatBottom | MorningStar | ThreeWhiteSoldiers
            | ThreeInsideUp | ThreeOutsideUp | ThreeRivers | ThreeStars | BullishIslandReversal
            | BullishThreeLineStrike | RisingThreeMethods => Bias::Bullish,
            GravestoneDoji | HangingMan | ShootingStar | BearishEngulfing | BearishHarami
            | DarkCloudCover | TweezerTop | GapDown | FlatTop | EveningStar | ThreeBlackCrows
            | ThreeInsideDown | ThreeOutsideDown | ThreeMountains | BearishIslandReversal
            | BearishThreeLineStrike | FallingThreeMethods => Bias::Bearish,
        }
    }

    /// Rank among patterns of the same span (5 highest).
    #[must_use]
    pub fn priority(self) -> u8 {
        use CandlePattern::*;
        match self {
            BullishEngulfing | BearishEngulfing | MorningStar | EveningStar
            | BullishIslandReversal | BearishIslandReversal | RisingThreeMethods
            | FallingThreeMethods => 5,
            BullishHarami | BearishHarami | PiercingLine | DarkCloudCover | ThreeWhiteSoldiers
            | ThreeBlackCrows | ThreeMountains | ThreeRivers | BullishThreeLineStrike
            | BearishThreeLineStrike => 4,
            TweezerBottom | TweezerTop | GapUp | GapDown | ThreeInsideUp | ThreeInsideDown
            | ThreeOutsideUp | ThreeOutsideDown | ThreeStars => 3,
            FlatTop | FlatBottom => 2,
            Doji | LongLeggedDoji | GravestoneDoji | SpinningTop | Hammer | InvertedHammer
            | HangingMan | ShootingStar => 1,
        }
    }
}

fn is_doji(bar: &PriceBar) -> bool {
    let body = bar.body();
    body <= bar.range() * 0.1 && bar.upper_shadow() > body && bar.lower_shadow() > body
}

fn is_hammer_shape(bar: &PriceBar) -> bool {
    let body = bar.body();
    bar.lower_shadow() >= body * 2.0 && bar.upper_shadow() <= body * 0.1 && body >= bar.range() * 0.1
}

fn is_inverted_shape(bar: &PriceBar) -> bool {
    let body = bar.body();
    bar.upper_shadow() >= body * 2.0 && bar.lower_shadow() <= body * 0.1 && body >= bar.range() * 0.1
}

/// Every single-bar shape `bar` matches, in catalog order.
///
/// A bar with zero range matches nothing.
#[must_use]
pub fn single_bar(bar: &PriceBar) -> Vec<CandlePattern> {
    let range = bar.range();
    if range <= 0.0 {
        return Vec::new();
    }
    let body = bar.body();
    let upper = bar.upper_shadow();
    let lower = bar.lower_shadow();

    let checks = [
        (is_doji(bar), CandlePattern::Doji),
        (
            body <= range * 0.1 && upper >= range * 0.3 && lower >= range * 0.3,
            CandlePattern::LongLeggedDoji,
        ),
        (
            body <= range * 0.1 && upper >= range * 0.6 && lower <= range * 0.1,
            CandlePattern::GravestoneDoji,
        ),
        (
            body <= range * 0.3
                && upper >= body
                && lower >= body
                && (upper - lower).abs() <= range * 0.1,
            CandlePattern::SpinningTop,
        ),
        (is_hammer_shape(bar), CandlePattern::Hammer),
        (is_inverted_shape(bar), CandlePattern::InvertedHammer),
        (
            is_hammer_shape(bar) && bar.is_bearish(),
            CandlePattern::HangingMan,
        ),
        (is_inverted_shape(bar), CandlePattern::ShootingStar),
    ];
    checks
        .into_iter()
        .filter_map(|(hit, pattern)| hit.then_some(pattern))
        .collect()
}

fn two_bar(d1: &PriceBar, d2: &PriceBar) -> Vec<(bool, CandlePattern)> {
    let tolerance = d1.range() * LEVEL_TOLERANCE;
    let measurable = d1.range() > 0.0;
    let mid1 = d1.body_mid();

    vec![
        (
            d1.is_bearish() && d2.is_bullish() && d2.open < d1.close && d2.close > d1.open,
            CandlePattern::BullishEngulfing,
        ),
        (
            d1.is_bullish() && d2.is_bearish() && d2.open > d1.close && d2.close < d1.open,
            CandlePattern::BearishEngulfing,
        ),
        (
            d1.is_bearish()
                && d2.is_bullish()
                && d2.open > d1.close
                && d2.close < d1.open
                && d2.body() < d1.body() * 0.5,
            CandlePattern::BullishHarami,
        ),
        (
            d1.is_bullish()
                && d2.is_bearish()
                && d2.open < d1.close
                && d2.close > d1.open
                && d2.body() < d1.body() * 0.5,
            CandlePattern::BearishHarami,
        ),
        (
            d1.is_bearish() && d2.is_bullish() && d2.open < d1.close && d2.close > mid1,
            CandlePattern::PiercingLine,
        ),
        (
            d1.is_bullish() && d2.is_bearish() && d2.open > d1.close && d2.close < mid1,
            CandlePattern::DarkCloudCover,
        ),
        (
            measurable
                && d1.is_bearish()
                && d2.is_bullish()
                && (d1.low - d2.low).abs() <= tolerance,
            CandlePattern::TweezerBottom,
        ),
        (
            measurable
                && d1.is_bullish()
                && d2.is_bearish()
                && (d1.high - d2.high).abs() <= tolerance,
            CandlePattern::TweezerTop,
        ),
        (d2.low > d1.high, CandlePattern::GapUp),
        (d2.high < d1.low, CandlePattern::GapDown),
        (
            measurable && (d1.high - d2.high).abs() <= tolerance,
            CandlePattern::FlatTop,
        ),
        (
            measurable && (d1.low - d2.low).abs() <= tolerance,
            CandlePattern::FlatBottom,
        ),
    ]
}

fn is_inside_bar(d1: &PriceBar, d2: &PriceBar) -> bool {
    d2.high < d1.high && d2.low > d1.low
}

fn is_outside_bar(d1: &PriceBar, d2: &PriceBar) -> bool {
    d2.high > d1.high && d2.low < d1.low
}

fn three_bar(d1: &PriceBar, d2: &PriceBar, d3: &PriceBar) -> Vec<(bool, CandlePattern)> {
    let mid1 = d1.body_mid();
    let small_middle = d2.body() < d2.range() * 0.3;
    let range1 = d1.range();
    let measurable = range1 > 0.0;
    let days = [d1, d2, d3];

    let soldiers = days.iter().all(|d| d.is_bullish())
        && d2.close > d1.close
        && d3.close > d2.close
        && d2.open > d1.open
        && d3.open > d2.open;
    let crows = days.iter().all(|d| d.is_bearish())
        && d2.close < d1.close
        && d3.close < d2.close
        && d2.open < d1.open
        && d3.open < d2.open;

    vec![
        (
            d1.is_bearish()
                && small_middle
                && d3.is_bullish()
                && d2.high < d1.close
                && d3.close > mid1,
            CandlePattern::MorningStar,
        ),
        (
            d1.is_bullish()
                && small_middle
                && d3.is_bearish()
                && d2.low > d1.close
                && d3.close < mid1,
            CandlePattern::EveningStar,
        ),
        (soldiers, CandlePattern::ThreeWhiteSoldiers),
        (crows, CandlePattern::ThreeBlackCrows),
        (
            is_inside_bar(d1, d2) && d1.is_bearish() && d3.is_bullish() && d3.close > d2.high,
            CandlePattern::ThreeInsideUp,
        ),
        (
            is_inside_bar(d1, d2) && d1.is_bullish() && d3.is_bearish() && d3.close < d2.low,
            CandlePattern::ThreeInsideDown,
        ),
        (
            is_outside_bar(d1, d2)
                && d1.is_bearish()
                && d2.is_bullish()
                && d3.is_bullish()
                && d3.close > d2.high,
            CandlePattern::ThreeOutsideUp,
        ),
        (
            is_outside_bar(d1, d2)
                && d1.is_bullish()
                && d2.is_bearish()
                && d3.is_bearish()
                && d3.close < d2.low,
            CandlePattern::ThreeOutsideDown,
        ),
        (
            measurable
                && d2.high > d1.high
                && d2.high > d3.high
                && (d1.high - d3.high).abs() <= range1 * 0.1,
            CandlePattern::ThreeMountains,
        ),
        (
            measurable
                && d2.low < d1.low
                && d2.low < d3.low
                && (d1.low - d3.low).abs() <= range1 * 0.1,
            CandlePattern::ThreeRivers,
        ),
        (
            days.iter().all(|d| d.range() > 0.0 && is_doji(d)),
            CandlePattern::ThreeStars,
        ),
        (
            d2.high < d1.low && d3.low > d2.high,
            CandlePattern::BullishIslandReversal,
        ),
        (
            d2.low > d1.high && d3.high < d2.low,
            CandlePattern::BearishIslandReversal,
        ),
    ]
}

fn four_bar(days: &[PriceBar]) -> Vec<(bool, CandlePattern)> {
    let (first_three, last) = (&days[..3], &days[3]);
    vec![
        (
            first_three.iter().all(PriceBar::is_bearish)
                && last.is_bullish()
                && last.close > days[0].open,
            CandlePattern::BullishThreeLineStrike,
        ),
        (
            first_three.iter().all(PriceBar::is_bullish)
                && last.is_bearish()
                && last.close < days[0].open,
            CandlePattern::BearishThreeLineStrike,
        ),
    ]
}

fn five_bar(days: &[PriceBar]) -> Vec<(bool, CandlePattern)> {
    let (first, middle, last) = (&days[0], &days[1..4], &days[4]);
    vec![
        (
            first.is_bullish()
                && last.is_bullish()
                && last.close > first.close
                && middle.iter().all(|d| d.is_bearish() && d.low > first.open),
            CandlePattern::RisingThreeMethods,
        ),
        (
            first.is_bearish()
                && last.is_bearish()
                && last.close < first.close
                && middle.iter().all(|d| d.is_bullish() && d.high < first.open),
            CandlePattern::FallingThreeMethods,
        ),
    ]
}

/// Highest-priority pattern spanning exactly `days` (two to five bars).
#[must_use]
pub fn multi_bar(days: &[PriceBar]) -> Option<CandlePattern> {
    let candidates = match days {
        [d1, d2] => two_bar(d1, d2),
        [d1, d2, d3] => three_bar(d1, d2, d3),
        [_, _, _, _] => four_bar(days),
        [_, _, _, _, _] => five_bar(days),
        _ => return None,
    };
    candidates
        .into_iter()
        .filter_map(|(hit, pattern)| hit.then_some(pattern))
        .min_by_key(|pattern| Reverse(pattern.priority()))
}

/// Patterns completing on `bars[end]`, using at most `lookback` bars and
/// never reaching before the start of `bars`.
#[must_use]
pub fn patterns_ending_at(bars: &[PriceBar], end: usize, lookback: usize) -> Vec<CandlePattern> {
    let Some(last) = bars.get(end) else {
        return Vec::new();
    };
    let mut found = single_bar(last);
    for span in 2..=lookback.min(end + 1) {
        found.extend(multi_bar(&bars[end + 1 - span..=end]));
    }
    found
}
