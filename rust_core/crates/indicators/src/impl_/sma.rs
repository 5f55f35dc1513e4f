//! Simple moving average

/// Rolling arithmetic mean of `values` over `period` entries.
///
/// Output is aligned with the input; the first `period - 1` entries are NaN.
#[must_use]
pub fn sma_values(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];

    if len < period || period == 0 {
        return result;
    }

    // Calculate initial sum
    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    // Rolling calculation
    for i in period..len {
        sum += values[i] - values[i - period];
        result[i] = sum / period as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_basic() {
        let result = sma_values(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10); // (1+2+3)/3 = 2.0
        assert!((result[3] - 3.0).abs() < 1e-10); // (2+3+4)/3 = 3.0
        assert!((result[4] - 4.0).abs() < 1e-10); // (3+4+5)/3 = 4.0
    }

    #[test]
    fn test_sma_constant_input_is_exact() {
        let values = vec![100.0; 60];
        let result = sma_values(&values, 20);

        for value in result.iter().skip(19) {
            assert_eq!(*value, 100.0);
        }
    }

    #[test]
    fn test_sma_insufficient_data() {
        let result = sma_values(&[1.0, 2.0], 5);

        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_period_one_matches_close() {
        let values = vec![1.5, 2.5, 3.0];
        let result = sma_values(&values, 1);

        for (close, value) in values.iter().zip(result.iter()) {
            assert!((*value - close).abs() < 1e-10);
        }
    }

    #[test]
    fn test_sma_period_zero_returns_nan() {
        let result = sma_values(&[1.0, 2.0, 3.0], 0);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
