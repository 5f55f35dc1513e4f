//! Indicator aggregation.
//!
//! Validates one series, extracts the short/medium/long windows once and
//! runs every registered calculator against them. A calculator lacking
//! bars yields [`IndicatorOutcome::InsufficientData`] instead of failing
//! the whole summary.

use std::sync::Arc;

use rayon::prelude::*;
use stockscope_data::{DataError, validate_bars};
use stockscope_indicators::{
    IndicatorError, IndicatorKind, IndicatorOutcome, IndicatorRegistry, IndicatorSummary,
    WindowSet, WindowedIndicator,
};
use stockscope_types::{AnalysisConfig, PriceSeries};
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::snapshot::{AnalysisReport, MarketSnapshot};

/// Runs the configured calculators over price series.
///
/// Holds no per-series state; one aggregator can serve any number of
/// requests, from any thread.
pub struct Aggregator {
    config: AnalysisConfig,
    calculators: Vec<Arc<dyn WindowedIndicator>>,
}

impl Aggregator {
    /// Builds the six standard calculators from `config`.
    ///
    /// # Errors
    /// [`AnalysisError::Config`] when `config` fails validation.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        Self::with_registry(config, &IndicatorRegistry::with_defaults())
    }

    /// Builds every calculator registered in `registry`.
    ///
    /// # Errors
    /// [`AnalysisError::Config`] when `config` fails validation.
    pub fn with_registry(
        config: AnalysisConfig,
        registry: &IndicatorRegistry,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        let calculators = registry.build_all(&config);
        debug!(calculators = calculators.len(), parallel = config.parallel, "aggregator ready");
        Ok(Self {
            config,
            calculators,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Indicator families this aggregator reports.
    #[must_use]
    pub fn kinds(&self) -> Vec<IndicatorKind> {
        self.calculators.iter().map(|c| c.kind()).collect()
    }

    /// Runs every calculator over `series`, keyed by indicator.
    ///
    /// # Errors
    /// - [`AnalysisError::Data`] when the series is empty or malformed.
    /// - [`AnalysisError::Indicator`] when a calculator fails for a reason
    ///   other than insufficient data.
    pub fn aggregate(&self, series: &PriceSeries) -> Result<IndicatorSummary, AnalysisError> {
        if let Err(err) = validate_bars(series.bars()) {
            warn!(error = %err, "rejecting malformed series");
            return Err(err.into());
        }

        let windows = WindowSet::from_series(series, &self.config.windows);
        let run = |calculator: &Arc<dyn WindowedIndicator>| {
            run_calculator(calculator.as_ref(), series, &windows)
        };

        let outcomes = if self.config.parallel {
            self.calculators
                .par_iter()
                .map(run)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.calculators
                .iter()
                .map(run)
                .collect::<Result<Vec<_>, _>>()?
        };

        let summary: IndicatorSummary = outcomes.into_iter().collect();
        let computed = summary.iter().filter(|(_, o)| o.is_computed()).count();
        info!(
            bars = series.len(),
            computed,
            insufficient = summary.len() - computed,
            "indicator aggregation finished"
        );
        Ok(summary)
    }

    /// Aggregates `series` and wraps the result with its snapshot.
    ///
    /// # Errors
    /// Any error from [`Aggregator::aggregate`].
    pub fn analyze(
        &self,
        symbol: &str,
        series: &PriceSeries,
    ) -> Result<AnalysisReport, AnalysisError> {
        let indicators = self.aggregate(series)?;
        let snapshot = MarketSnapshot::from_series(series).ok_or(DataError::EmptyData)?;

        Ok(AnalysisReport {
            symbol: symbol.to_string(),
            as_of: snapshot.date,
            bars: series.len(),
            snapshot,
            indicators,
        })
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("kinds", &self.kinds())
            .field("parallel", &self.config.parallel)
            .finish()
    }
}

fn run_calculator(
    calculator: &dyn WindowedIndicator,
    series: &PriceSeries,
    windows: &WindowSet<'_>,
) -> Result<(IndicatorKind, IndicatorOutcome), IndicatorError> {
    let kind = calculator.kind();
    match calculator.analyze(series, windows) {
        Ok(report) => Ok((kind, IndicatorOutcome::Computed { report })),
        Err(err) => {
            let (required, available) = err.as_insufficient().ok_or(err)?;
            warn!(indicator = %kind, required, available, "insufficient data");
            Ok((
                kind,
                IndicatorOutcome::InsufficientData {
                    required,
                    available,
                },
            ))
        }
    }
}

/// Aggregates `series` with the default configuration.
///
/// # Errors
/// Any error from [`Aggregator::aggregate`].
pub fn aggregate(series: &PriceSeries) -> Result<IndicatorSummary, AnalysisError> {
    Aggregator::new(AnalysisConfig::default())?.aggregate(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockscope_types::PriceBar;

    fn bars(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.macd.fast = 40;
        assert!(matches!(
            Aggregator::new(config),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn test_short_series_marks_insufficient() {
        let summary = aggregate(&bars(&[10.0, 11.0, 12.0])).unwrap();

        assert_eq!(summary.len(), 6);
        assert!(matches!(
            summary.get(IndicatorKind::Macd),
            Some(IndicatorOutcome::InsufficientData {
                required: 35,
                available: 3
            })
        ));
        assert!(matches!(
            summary.get(IndicatorKind::Ma),
            Some(IndicatorOutcome::InsufficientData { required: 5, .. })
        ));
        assert!(summary.iter().all(|(_, outcome)| !outcome.is_computed()));
    }

    #[test]
    fn test_rejects_empty_series() {
        let err = aggregate(&PriceSeries::default()).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_rejects_overflowing_prices() {
        let err = aggregate(&bars(&[1e307; 60])).unwrap_err();

        assert!(matches!(err, AnalysisError::Data(DataError::CorruptData(_))));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_custom_registry_limits_kinds() {
        let mut registry = IndicatorRegistry::new();
        registry.register(IndicatorKind::Rsi, |config| {
            Arc::new(stockscope_indicators::RsiCalculator::new(config.rsi.clone()))
        });
        let aggregator = Aggregator::with_registry(AnalysisConfig::default(), &registry).unwrap();
        assert_eq!(aggregator.kinds(), vec![IndicatorKind::Rsi]);

        let summary = aggregator.aggregate(&bars(&[10.0; 20])).unwrap();
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn test_unusable_calculator_fails_aggregation() {
        let mut registry = IndicatorRegistry::with_defaults();
        registry.register(IndicatorKind::Boll, |config| {
            let mut boll = config.boll;
            boll.std_factor = -1.0;
            Arc::new(stockscope_indicators::BollCalculator::new(boll))
        });
        let aggregator = Aggregator::with_registry(AnalysisConfig::default(), &registry).unwrap();

        let err = aggregator.aggregate(&bars(&[10.0; 30])).unwrap_err();
        assert!(matches!(err, AnalysisError::Indicator(_)));
        assert_eq!(err.error_category(), "runtime");
    }

    #[test]
    fn test_analyze_wraps_snapshot() {
        let aggregator = Aggregator::new(AnalysisConfig::default()).unwrap();
        let series = bars(&[10.0, 10.0, 11.0]);
        let report = aggregator.analyze("600519", &series).unwrap();

        assert_eq!(report.symbol, "600519");
        assert_eq!(report.bars, 3);
        assert_eq!(report.as_of, series.last().unwrap().date);
        assert!((report.snapshot.change_pct.unwrap() - 10.0).abs() < 1e-10);
    }
}
