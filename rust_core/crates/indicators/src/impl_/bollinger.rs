//! Bollinger Bands over close prices

use crate::impl_::sma::sma_values;
use crate::traits::MultiOutputIndicator;
use stockscope_types::PriceBar;

/// Upper, middle and lower band lines, aligned with the input.
#[derive(Debug, Clone, Default)]
pub struct BollingerResult {
    /// `middle + std_factor * std`
    pub upper: Vec<f64>,
    /// Rolling mean of the closes
    pub middle: Vec<f64>,
    /// `middle - std_factor * std`
    pub lower: Vec<f64>,
}

impl BollingerResult {
    /// Band width `upper - lower` per bar (NaN during warmup).
    #[must_use]
    pub fn widths(&self) -> Vec<f64> {
        self.upper
            .iter()
            .zip(&self.lower)
            .map(|(u, l)| u - l)
            .collect()
    }
}

/// Bands of `values` over `period` entries, `std_factor` population
/// standard deviations around the rolling mean.
///
/// The first `period - 1` entries of every line are NaN; all entries are
/// NaN when fewer than `period` values are given.
#[must_use]
pub fn bollinger_values(values: &[f64], period: usize, std_factor: f64) -> BollingerResult {
    let middle = sma_values(values, period);
    let mut upper = vec![f64::NAN; values.len()];
    let mut lower = vec![f64::NAN; values.len()];

    for (i, &mean) in middle.iter().enumerate().filter(|(_, m)| m.is_finite()) {
        let window = &values[i + 1 - period..=i];
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let offset = std_factor * variance.sqrt();
        upper[i] = mean + offset;
        lower[i] = mean - offset;
    }

    BollingerResult {
        upper,
        middle,
        lower,
    }
}

/// Bollinger Bands indicator (`BOLL`).
#[derive(Debug, Clone)]
pub struct BollingerBands {
    /// Rolling window for the mean and standard deviation
    pub period: usize,
    /// Standard deviations between the middle and outer bands
    pub std_factor: f64,
}

impl BollingerBands {
    /// Creates the indicator.
    #[must_use]
    pub fn new(period: usize, std_factor: f64) -> Self {
        Self { period, std_factor }
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Output = BollingerResult;

    fn compute_all(&self, bars: &[PriceBar]) -> Self::Output {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        bollinger_values(&closes, self.period, self.std_factor)
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_population_std_bands() {
        let result = bollinger_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 2.0);

        // textbook sample: mean 5, population std 2
        assert!(result.middle[..7].iter().all(|v| v.is_nan()));
        assert_relative_eq!(result.middle[7], 5.0, epsilon = 1e-12);
        assert_relative_eq!(result.upper[7], 9.0, epsilon = 1e-12);
        assert_relative_eq!(result.lower[7], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_closes_collapse_bands() {
        let result = bollinger_values(&[42.0; 12], 5, 2.0);

        for (i, width) in result.widths().iter().enumerate().skip(4) {
            assert_relative_eq!(result.middle[i], 42.0);
            assert_relative_eq!(*width, 0.0);
        }
    }

    #[test]
    fn test_bands_symmetric_around_middle() {
        let closes = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
        let result = bollinger_values(&closes, 4, 1.5);

        for i in 3..closes.len() {
            assert_relative_eq!(
                result.upper[i] - result.middle[i],
                result.middle[i] - result.lower[i],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_short_input_all_nan() {
        let result = bollinger_values(&[1.0, 2.0], 5, 2.0);

        assert_eq!(result.upper.len(), 2);
        assert!(
            [&result.upper, &result.middle, &result.lower]
                .iter()
                .all(|line| line.iter().all(|v| v.is_nan()))
        );
        assert_eq!(BollingerBands::new(5, 2.0).warmup_periods(), 5);
    }
}
