//! Indicator traits.
//!
//! Two layers: series primitives ([`MultiOutputIndicator`]) that map bars
//! to aligned value vectors, and [`WindowedIndicator`], the
//! capability shared by the six calculators that turn a series plus its
//! short/medium/long windows into a summary record.

use stockscope_types::{PriceBar, PriceSeries};

use crate::error::IndicatorError;
use crate::report::{IndicatorKind, IndicatorReport};
use crate::window::WindowSet;

/// Series primitive producing several aligned lines (Bollinger Bands, MACD,
/// KDJ) from one pass over the bars.
pub trait MultiOutputIndicator: Send + Sync {
    /// Line bundle, every line the same length as the input.
    type Output;

    /// Computes all lines at once. Entries before the warmup are NaN.
    fn compute_all(&self, bars: &[PriceBar]) -> Self::Output;

    /// Bars needed before the last line has its first defined value.
    fn warmup_periods(&self) -> usize;
}

/// A calculator that summarizes one indicator family over the trailing
/// windows of a series.
///
/// Implementations are pure: they read `series` and `windows` only and hold
/// no mutable state, so the aggregator may run them on any thread.
pub trait WindowedIndicator: Send + Sync {
    /// Key under which the summary is reported.
    fn kind(&self) -> IndicatorKind;

    /// Minimum series length for a computed summary.
    fn required_bars(&self) -> usize;

    /// Computes the summary.
    ///
    /// # Errors
    /// [`IndicatorError::InsufficientData`] when the series is shorter than
    /// [`required_bars`](Self::required_bars); the aggregator records it as
    /// an insufficient-data outcome instead of failing.
    fn analyze(
        &self,
        series: &PriceSeries,
        windows: &WindowSet<'_>,
    ) -> Result<IndicatorReport, IndicatorError>;

    /// Rejects parameters the calculator cannot work with.
    ///
    /// Calculators built from a validated `AnalysisConfig` always pass; the
    /// check matters for calculators registered with hand-built settings.
    ///
    /// # Errors
    /// [`IndicatorError::InvalidParams`] or [`IndicatorError::ParamOutOfRange`].
    fn check_params(&self) -> Result<(), IndicatorError> {
        Ok(())
    }

    /// Checks parameters, then returns an insufficient-data error when
    /// `series` is too short.
    ///
    /// # Errors
    /// Any error from [`check_params`](Self::check_params), then
    /// [`IndicatorError::InsufficientData`] with `required_bars()` and the
    /// series length.
    fn ensure_enough(&self, series: &PriceSeries) -> Result<(), IndicatorError> {
        self.check_params()?;
        let required = self.required_bars();
        if series.len() < required {
            return Err(IndicatorError::insufficient(required, series.len()));
        }
        Ok(())
    }
}
