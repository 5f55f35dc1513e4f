//! Candlestick pattern calculator.

pub mod patterns;

use std::cmp::Reverse;

use stockscope_types::{Bias, CandlestickConfig, PriceSeries, WindowTag};
use tracing::debug;

use crate::error::IndicatorError;
use crate::report::{IndicatorKind, IndicatorReport};
use crate::traits::WindowedIndicator;
use crate::window::{Window, WindowSet};

pub use patterns::CandlePattern;

/// Bars needed before any pattern is evaluated.
pub const MIN_BARS: usize = 5;

/// Strength at or above which a stance is reported as strong.
const STRONG_STRENGTH: f64 = 4.0;

/// Overall reading of the patterns on the latest bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleStance {
    /// Bullish weight dominates with strength >= 4
    StrongBullish,
    /// Bullish weight dominates
    Bullish,
    /// Bullish and bearish weight balance
    Neutral,
    /// Bearish weight dominates
    Bearish,
    /// Bearish weight dominates with strength >= 4
    StrongBearish,
    /// No pattern matched
    NoSignal,
}

/// Patterns seen in one window.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandleWindowSummary {
    /// Window evaluated
    pub window: WindowTag,
    /// Patterns completing on the window's last bar, using window bars
    /// only; serialized as `"none"` when empty
    #[serde(with = "pattern_list")]
    pub patterns: Vec<CandlePattern>,
    /// Bullish pattern completions anywhere in the window
    pub bullish: usize,
    /// Bearish pattern completions anywhere in the window
    pub bearish: usize,
}

/// Candlestick summary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandlestickReport {
    /// Patterns completing on the last bar; serialized as `"none"` when
    /// empty
    #[serde(with = "pattern_list")]
    pub patterns: Vec<CandlePattern>,
    /// Longest (then highest-priority) pattern among `patterns`
    pub primary: Option<CandlePattern>,
    /// Average span weight of the matched patterns, capped at 5
    pub strength: f64,
    /// Weighted bullish/bearish reading
    pub stance: CandleStance,
    /// Per-window view, long to short
    pub windows: Vec<CandleWindowSummary>,
}

/// Pattern lists with an explicit `"none"` for no match.
mod pattern_list {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::CandlePattern;

    pub const NONE: &str = "none";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<CandlePattern>),
        Marker(String),
    }

    pub fn serialize<S: Serializer>(
        patterns: &[CandlePattern],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if patterns.is_empty() {
            serializer.serialize_str(NONE)
        } else {
            patterns.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<CandlePattern>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::List(patterns) => Ok(patterns),
            Repr::Marker(marker) if marker == NONE => Ok(Vec::new()),
            Repr::Marker(other) => Err(D::Error::invalid_value(
                Unexpected::Str(&other),
                &"\"none\" or a list of patterns",
            )),
        }
    }
}

/// Candlestick pattern calculator.
#[derive(Debug, Clone)]
pub struct CandlestickCalculator {
    config: CandlestickConfig,
}

impl CandlestickCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new(config: CandlestickConfig) -> Self {
        Self { config }
    }

    fn summarize_window(&self, window: &Window<'_>) -> CandleWindowSummary {
        let bars = window.bars();
        let mut bullish = 0;
        let mut bearish = 0;
        for end in 0..bars.len() {
            for pattern in patterns::patterns_ending_at(bars, end, self.config.lookback) {
                match pattern.bias() {
                    Bias::Bullish => bullish += 1,
                    Bias::Bearish => bearish += 1,
                    Bias::Neutral => {}
                }
            }
        }
        let patterns = bars
            .len()
            .checked_sub(1)
            .map(|end| patterns::patterns_ending_at(bars, end, self.config.lookback))
            .unwrap_or_default();

        CandleWindowSummary {
            window: window.tag(),
            patterns,
            bullish,
            bearish,
        }
    }
}

impl Default for CandlestickCalculator {
    fn default() -> Self {
        Self::new(CandlestickConfig::default())
    }
}

impl WindowedIndicator for CandlestickCalculator {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Candlestick
    }

    fn check_params(&self) -> Result<(), IndicatorError> {
        let lookback = self.config.lookback;
        if !(1..=MIN_BARS).contains(&lookback) {
            return Err(IndicatorError::param_out_of_range(
                "candlestick.lookback",
                lookback as f64,
                1.0,
                MIN_BARS as f64,
            ));
        }
        Ok(())
    }

    fn required_bars(&self) -> usize {
        MIN_BARS
    }

    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError> {
        self.ensure_enough(series)?;
        let bars = series.bars();
        let end = bars.len() - 1;

        let patterns = patterns::patterns_ending_at(bars, end, self.config.lookback);
        let (strength, stance) = score(&patterns);
        let primary = patterns
            .iter()
            .copied()
            .min_by_key(|p| (Reverse(p.span()), Reverse(p.priority())));

        let report = CandlestickReport {
            primary,
            strength,
            stance,
            windows: windows.iter().map(|w| self.summarize_window(w)).collect(),
            patterns,
        };

        debug!(
            matched = report.patterns.len(),
            stance = ?report.stance,
            "candlestick patterns computed"
        );
        Ok(IndicatorReport::Candlestick(report))
    }
}

/// Strength and stance of a set of patterns.
///
/// Each pattern adds its span to the total weight and to the bullish or
/// bearish side; strength is the total weight per pattern, capped at 5.
#[must_use]
pub fn score(patterns: &[CandlePattern]) -> (f64, CandleStance) {
    if patterns.is_empty() {
        return (0.0, CandleStance::NoSignal);
    }

    let mut total = 0usize;
    let mut bullish = 0usize;
    let mut bearish = 0usize;
    for pattern in patterns {
        let weight = pattern.span();
        total += weight;
        match pattern.bias() {
            Bias::Bullish => bullish += weight,
            Bias::Bearish => bearish += weight,
            Bias::Neutral => {}
        }
    }

    let strength = (total as f64 / patterns.len() as f64).min(5.0);
    let strong = strength >= STRONG_STRENGTH;
    let stance = match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater if strong => CandleStance::StrongBullish,
        std::cmp::Ordering::Greater => CandleStance::Bullish,
        std::cmp::Ordering::Less if strong => CandleStance::StrongBearish,
        std::cmp::Ordering::Less => CandleStance::Bearish,
        std::cmp::Ordering::Equal => CandleStance::Neutral,
    };
    (strength, stance)
}
