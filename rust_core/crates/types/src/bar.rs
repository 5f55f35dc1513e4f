use chrono::NaiveDate;

/// One trading day of OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl PriceBar {
    /// Absolute size of the real body.
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// High-low range.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Distance from the top of the body to the high.
    #[must_use]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Distance from the bottom of the body to the low.
    #[must_use]
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Close above open.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Midpoint of the real body.
    #[must_use]
    pub fn body_mid(&self) -> f64 {
        (self.open + self.close) / 2.0
    }
}

/// Chronologically ordered daily bars for one ticker, oldest first.
///
/// The series is read-only once built. Ordering and value sanity are
/// checked by the data layer before a series reaches the calculators.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Wraps bars without validation.
    #[must_use]
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    /// All bars, oldest first.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true when the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Close prices in series order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Consumes the series and returns the bars.
    #[must_use]
    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}
