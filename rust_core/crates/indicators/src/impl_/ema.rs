//! Exponential moving average

/// Exponential moving average of `values`.
///
/// Leading non-finite entries are skipped. The EMA is seeded with the simple
/// average of the first `period` finite values and then follows
/// `EMA_t = v_t * k + EMA_{t-1} * (1 - k)` with `k = 2 / (period + 1)`.
/// Entries before the seed are NaN; a non-finite value after the seed
/// carries the previous EMA forward.
#[must_use]
pub fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];

    if period == 0 {
        return result;
    }
    let Some(first) = values.iter().position(|v| v.is_finite()) else {
        return result;
    };
    let seed_end = first + period;
    if seed_end > len || !values[first..seed_end].iter().all(|v| v.is_finite()) {
        return result;
    }

    let alpha = multiplier(period);
    let mut prev = values[first..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = prev;

    for (value, out) in values[seed_end..].iter().zip(&mut result[seed_end..]) {
        if value.is_finite() {
            prev = alpha * value + (1.0 - alpha) * prev;
        }
        *out = prev;
    }

    result
}

/// EMA smoothing factor `2 / (period + 1)`.
#[inline]
fn multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_with_sma() {
        let result = ema_values(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10); // seed = (1+2+3)/3
        assert!((result[3] - 3.0).abs() < 1e-10); // 0.5*4 + 0.5*2
        assert!((result[4] - 4.0).abs() < 1e-10); // 0.5*5 + 0.5*3
    }

    #[test]
    fn test_ema_skips_leading_nan() {
        let values = [f64::NAN, f64::NAN, 2.0, 4.0, 6.0];
        let result = ema_values(&values, 2);

        assert!(result[2].is_nan());
        assert!((result[3] - 3.0).abs() < 1e-10);
        // k = 2/3: 6*2/3 + 3/3 = 5
        assert!((result[4] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_stays_at_constant() {
        let result = ema_values(&[5.0; 20], 5);

        for (i, value) in result.iter().enumerate().skip(4) {
            assert!((*value - 5.0).abs() < 1e-10, "EMA[{i}] = {value} != 5.0");
        }
    }

    #[test]
    fn test_ema_insufficient_data() {
        let result = ema_values(&[1.0, 2.0], 5);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ema_multiplier() {
        let expected = 2.0 / 11.0;
        assert!((multiplier(10) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_ema_period_one_matches_input() {
        let values = [1.0, 2.0, 3.5, 2.5];
        let result = ema_values(&values, 1);

        for (input, value) in values.iter().zip(result.iter()) {
            assert!((*value - input).abs() < 1e-10);
        }
    }

    #[test]
    fn test_ema_period_zero_returns_nan() {
        let result = ema_values(&[1.0, 2.0, 3.0], 0);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
