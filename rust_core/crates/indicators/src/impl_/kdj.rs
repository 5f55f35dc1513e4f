//! KDJ stochastic oscillator

use crate::traits::MultiOutputIndicator;
use stockscope_types::PriceBar;

/// Value K and D start from before the first RSV.
pub const KDJ_SEED: f64 = 50.0;

/// KDJ result: K, D and J lines.
#[derive(Debug, Clone)]
pub struct KdjResult {
    /// K line
    pub k: Vec<f64>,
    /// D line
    pub d: Vec<f64>,
    /// J = 3K - 2D, not clamped
    pub j: Vec<f64>,
}

/// KDJ over high/low/close.
///
/// `RSV = (close - LLV) / (HHV - LLV) * 100` over `period` bars (50 when the
/// range is flat), `K = (2 K' + RSV) / 3`, `D = (2 D' + K) / 3`,
/// `J = 3K - 2D`, with K' and D' seeded at 50.
#[derive(Debug, Clone)]
pub struct KDJ {
    /// RSV lookback
    pub period: usize,
}

impl KDJ {
    /// Creates a new KDJ indicator.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Raw stochastic value of `window`'s last close.
    #[inline]
    fn rsv(window: &[PriceBar]) -> f64 {
        let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let close = window.last().map_or(f64::NAN, |b| b.close);
        let range = highest - lowest;
        if range > 0.0 {
            ((close - lowest) / range * 100.0).clamp(0.0, 100.0)
        } else {
            KDJ_SEED
        }
    }
}

impl MultiOutputIndicator for KDJ {
    type Output = KdjResult;

    fn compute_all(&self, bars: &[PriceBar]) -> Self::Output {
        let len = bars.len();
        let mut k = vec![f64::NAN; len];
        let mut d = vec![f64::NAN; len];
        let mut j = vec![f64::NAN; len];

        if len < self.period || self.period == 0 {
            return KdjResult { k, d, j };
        }

        let mut prev_k = KDJ_SEED;
        let mut prev_d = KDJ_SEED;
        for i in (self.period - 1)..len {
            let rsv = Self::rsv(&bars[i + 1 - self.period..=i]);
            let cur_k = (2.0 * prev_k + rsv) / 3.0;
            let cur_d = (2.0 * prev_d + cur_k) / 3.0;

            k[i] = cur_k;
            d[i] = cur_d;
            j[i] = 3.0 * cur_k - 2.0 * cur_d;

            prev_k = cur_k;
            prev_d = cur_d;
        }

        KdjResult { k, d, j }
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
