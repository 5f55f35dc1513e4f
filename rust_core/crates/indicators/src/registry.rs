//! Calculator registry.
//!
//! Maps each [`IndicatorKind`] to a factory that builds its calculator
//! from an [`AnalysisConfig`].

use std::collections::BTreeMap;
use std::sync::Arc;

use stockscope_types::AnalysisConfig;

use crate::calculators::{
    BollCalculator, CandlestickCalculator, KdjCalculator, MacdCalculator, MaSystem, RsiCalculator,
};
use crate::error::IndicatorError;
use crate::report::IndicatorKind;
use crate::traits::WindowedIndicator;

/// Factory function type for creating calculators from configuration.
pub type CalculatorFactory =
    Box<dyn Fn(&AnalysisConfig) -> Arc<dyn WindowedIndicator> + Send + Sync>;

/// Registry for calculator factories.
///
/// Iteration order is the [`IndicatorKind`] order, so summaries built from
/// the registry are stable.
pub struct IndicatorRegistry {
    factories: BTreeMap<IndicatorKind, CalculatorFactory>,
}

impl IndicatorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a calculator factory, replacing any previous one for `kind`.
    pub fn register<F>(&mut self, kind: IndicatorKind, factory: F)
    where
        F: Fn(&AnalysisConfig) -> Arc<dyn WindowedIndicator> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    /// Builds the calculator for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::UnknownIndicator`] if `kind` is not registered.
    pub fn create(
        &self,
        kind: IndicatorKind,
        config: &AnalysisConfig,
    ) -> Result<Arc<dyn WindowedIndicator>, IndicatorError> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| IndicatorError::UnknownIndicator(kind.to_string()))?;
        Ok(factory(config))
    }

    /// Builds a calculator by report key (`"MACD"`, `"boll"`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::UnknownIndicator`] for an unknown or
    /// unregistered name.
    pub fn create_by_name(
        &self,
        name: &str,
        config: &AnalysisConfig,
    ) -> Result<Arc<dyn WindowedIndicator>, IndicatorError> {
        self.create(name.parse()?, config)
    }

    /// Builds every registered calculator, in kind order.
    #[must_use]
    pub fn build_all(&self, config: &AnalysisConfig) -> Vec<Arc<dyn WindowedIndicator>> {
        self.factories.values().map(|factory| factory(config)).collect()
    }

    /// Checks if a calculator is registered.
    #[must_use]
    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Registered kinds, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<IndicatorKind> {
        self.factories.keys().copied().collect()
    }

    /// Number of registered calculators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Creates a registry with the six standard calculators.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(IndicatorKind::Ma, |config| {
            Arc::new(MaSystem::new(config.ma.clone()))
        });
        registry.register(IndicatorKind::Macd, |config| {
            Arc::new(MacdCalculator::new(config.macd))
        });
        registry.register(IndicatorKind::Kdj, |config| {
            Arc::new(KdjCalculator::new(config.kdj))
        });
        registry.register(IndicatorKind::Rsi, |config| {
            Arc::new(RsiCalculator::new(config.rsi.clone()))
        });
        registry.register(IndicatorKind::Boll, |config| {
            Arc::new(BollCalculator::new(config.boll))
        });
        registry.register(IndicatorKind::Candlestick, |config| {
            Arc::new(CandlestickCalculator::new(config.candlestick))
        });

        registry
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for IndicatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
