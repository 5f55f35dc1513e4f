//! Relative Strength Index (RSI) with Wilder smoothing

/// Wilder RSI of `prices`.
///
/// The first average gain/loss is the simple mean of the first `period`
/// changes; later averages use `avg = (prev * (n - 1) + x) / n`.
/// Entries before index `period` are NaN. Returns all-NaN when fewer than
/// `period + 1` prices are given.
#[must_use]
pub fn rsi_values(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |c: f64| c.max(0.0);
    let loss = |c: f64| (-c).max(0.0);

    let p = period as f64;
    let mut avg_gain = changes[..period].iter().copied().map(gain).sum::<f64>() / p;
    let mut avg_loss = changes[..period].iter().copied().map(loss).sum::<f64>() / p;
    result[period] = rsi_from_averages(avg_gain, avg_loss);

    for (i, change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (p - 1.0) + gain(*change)) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss(*change)) / p;
        result[i + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

/// RSI from average gain and loss.
///
/// No movement at all gives the neutral 50; gains without losses give 100.
#[inline]
#[must_use]
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}
