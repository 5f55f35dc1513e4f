//! Moving Average Convergence Divergence (MACD) indicator

use crate::impl_::ema::ema_values;
use crate::traits::MultiOutputIndicator;
use stockscope_types::PriceBar;

/// MACD result: MACD line, signal line and histogram.
#[derive(Debug, Clone)]
pub struct MacdResult {
    /// EMA(fast) - EMA(slow)
    pub macd: Vec<f64>,
    /// EMA(signal) of the MACD line
    pub signal: Vec<f64>,
    /// MACD - signal
    pub histogram: Vec<f64>,
}

/// MACD over close prices.
///
/// Both EMAs and the signal line are SMA-seeded, so the MACD line starts at
/// index `slow - 1` and the signal line at `slow + signal - 2`.
#[derive(Debug, Clone)]
pub struct MACD {
    /// Fast EMA period
    pub fast: usize,
    /// Slow EMA period
    pub slow: usize,
    /// Signal EMA period
    pub signal: usize,
}

impl MACD {
    /// Creates a new MACD indicator.
    #[must_use]
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl Default for MACD {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl MultiOutputIndicator for MACD {
    type Output = MacdResult;

    fn compute_all(&self, bars: &[PriceBar]) -> Self::Output {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_values(&closes, self.fast);
        let slow = ema_values(&closes, self.slow);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_values(&macd, self.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdResult {
            macd,
            signal,
            histogram,
        }
    }

    fn warmup_periods(&self) -> usize {
        self.slow + self.signal - 1
    }
}
