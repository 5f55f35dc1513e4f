//! Summary records produced by the windowed calculators.
//!
//! Field names and tags are part of the downstream JSON contract: window
//! tags serialize as `short`/`medium`/`long`, indicator keys as `MA`,
//! `MACD`, `KDJ`, `RSI`, `BOLL`, `Candlestick`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use stockscope_types::{Bias, WindowTag};

use crate::calculators::boll::BollReport;
use crate::calculators::candlestick::CandlestickReport;
use crate::calculators::kdj::KdjReport;
use crate::calculators::ma_system::MaReport;
use crate::calculators::macd::MacdReport;
use crate::calculators::rsi::RsiReport;

/// Indicator family key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum IndicatorKind {
    /// Moving-average system
    #[serde(rename = "MA")]
    Ma,
    /// MACD
    #[serde(rename = "MACD")]
    Macd,
    /// KDJ stochastic
    #[serde(rename = "KDJ")]
    Kdj,
    /// Relative strength index
    #[serde(rename = "RSI")]
    Rsi,
    /// Bollinger Bands
    #[serde(rename = "BOLL")]
    Boll,
    /// Candlestick patterns
    Candlestick,
}

impl IndicatorKind {
    /// All six indicator families.
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::Macd,
        IndicatorKind::Kdj,
        IndicatorKind::Rsi,
        IndicatorKind::Boll,
        IndicatorKind::Ma,
        IndicatorKind::Candlestick,
    ];

    /// Stable report key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Ma => "MA",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Kdj => "KDJ",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Boll => "BOLL",
            IndicatorKind::Candlestick => "Candlestick",
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndicatorKind {
    type Err = crate::error::IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::IndicatorError::UnknownIndicator(s.to_string()))
    }
}

/// Kind of a detected signal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Faster line crossed above slower line
    GoldenCross,
    /// Faster line crossed below slower line
    DeathCross,
    /// Line crossed above zero
    ZeroCrossUp,
    /// Line crossed below zero
    ZeroCrossDown,
    /// Oscillator above its overbought threshold
    Overbought,
    /// Oscillator below its oversold threshold
    Oversold,
    /// Price falling while the oscillator rises
    BullishDivergence,
    /// Price rising while the oscillator falls
    BearishDivergence,
    /// Close above the upper band
    UpperBandBreakout,
    /// Close below the lower band
    LowerBandBreakout,
    /// High reached the upper band without closing above it
    UpperBandTouch,
    /// Low reached the lower band without closing below it
    LowerBandTouch,
    /// Band width well below its window average
    Squeeze,
    /// Band width well above its window average
    Expansion,
}

/// One detected event, tagged with the window it was found in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalEvent {
    /// Window the event was evaluated in
    pub window: WindowTag,
    /// What happened
    pub kind: SignalKind,
    /// Directional reading
    pub bias: Bias,
    /// Lines involved, e.g. `MA5/MA10`, `MACD/signal`, `K/D`
    pub subject: String,
    /// Bar on which the condition was observed
    pub date: NaiveDate,
}

/// Direction of a least-squares trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive slope beyond the flat tolerance
    Rising,
    /// Negative slope beyond the flat tolerance
    Falling,
    /// Slope within the flat tolerance
    Flat,
}

/// Trend of an indicator line over one window.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WindowTrend {
    /// Window the slope was fitted on
    pub window: WindowTag,
    /// Classified direction
    pub direction: Direction,
    /// Least-squares slope per bar
    pub slope: f64,
}

/// Computed summary of one indicator family.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "indicator")]
pub enum IndicatorReport {
    /// Moving-average system
    #[serde(rename = "MA")]
    Ma(MaReport),
    /// MACD
    #[serde(rename = "MACD")]
    Macd(MacdReport),
    /// KDJ
    #[serde(rename = "KDJ")]
    Kdj(KdjReport),
    /// RSI
    #[serde(rename = "RSI")]
    Rsi(RsiReport),
    /// Bollinger Bands
    #[serde(rename = "BOLL")]
    Boll(BollReport),
    /// Candlestick patterns
    Candlestick(CandlestickReport),
}

impl IndicatorReport {
    /// Family of this report.
    #[must_use]
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorReport::Ma(_) => IndicatorKind::Ma,
            IndicatorReport::Macd(_) => IndicatorKind::Macd,
            IndicatorReport::Kdj(_) => IndicatorKind::Kdj,
            IndicatorReport::Rsi(_) => IndicatorKind::Rsi,
            IndicatorReport::Boll(_) => IndicatorKind::Boll,
            IndicatorReport::Candlestick(_) => IndicatorKind::Candlestick,
        }
    }

    /// Signal events carried by the report (candlestick reports carry none).
    #[must_use]
    pub fn events(&self) -> &[SignalEvent] {
        match self {
            IndicatorReport::Ma(r) => &r.events,
            IndicatorReport::Macd(r) => &r.events,
            IndicatorReport::Kdj(r) => &r.events,
            IndicatorReport::Rsi(r) => &r.events,
            IndicatorReport::Boll(r) => &r.events,
            IndicatorReport::Candlestick(_) => &[],
        }
    }
}

/// Outcome of one calculator: computed values or insufficient data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndicatorOutcome {
    /// The calculator produced a summary
    Computed {
        /// The summary
        report: IndicatorReport,
    },
    /// The series was too short
    InsufficientData {
        /// Bars the calculator needs
        required: usize,
        /// Bars that were available
        available: usize,
    },
}

impl IndicatorOutcome {
    /// True for `Computed`.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, IndicatorOutcome::Computed { .. })
    }

    /// The report, when computed.
    #[must_use]
    pub fn report(&self) -> Option<&IndicatorReport> {
        match self {
            IndicatorOutcome::Computed { report } => Some(report),
            IndicatorOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Mapping from indicator key to outcome.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct IndicatorSummary {
    outcomes: BTreeMap<IndicatorKind, IndicatorOutcome>,
}

impl IndicatorSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `kind`, replacing any previous one.
    pub fn insert(&mut self, kind: IndicatorKind, outcome: IndicatorOutcome) {
        self.outcomes.insert(kind, outcome);
    }

    /// Outcome for `kind`.
    #[must_use]
    pub fn get(&self, kind: IndicatorKind) -> Option<&IndicatorOutcome> {
        self.outcomes.get(&kind)
    }

    /// Number of indicators in the summary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no indicator was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Indicator keys in stable order.
    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.outcomes.keys().copied()
    }

    /// `(kind, outcome)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorKind, &IndicatorOutcome)> {
        self.outcomes.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(IndicatorKind, IndicatorOutcome)> for IndicatorSummary {
    fn from_iter<T: IntoIterator<Item = (IndicatorKind, IndicatorOutcome)>>(iter: T) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
