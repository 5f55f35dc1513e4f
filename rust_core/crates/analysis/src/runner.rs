//! High-level analysis entry points.

use stockscope_data::{DateRange, PriceSource};
use stockscope_types::{AnalysisConfig, PriceBar, PriceSeries};
use tracing::info;

use crate::aggregator::Aggregator;
use crate::error::AnalysisError;
use crate::snapshot::AnalysisReport;

/// Request accepted by [`run_analysis_from_json`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AnalysisRequest {
    /// Ticker label copied into the report
    pub symbol: String,
    /// Optional configuration; classical defaults when absent
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
    /// Ascending daily bars
    pub bars: Vec<PriceBar>,
}

/// Main entry point: receives request JSON, returns report JSON.
///
/// # Errors
/// - [`AnalysisError::RequestParse`] when the JSON does not decode.
/// - [`AnalysisError::RequestValidation`] for a blank symbol.
/// - Any error from [`analyze_request`].
pub fn run_analysis_from_json(request_json: &str) -> Result<String, AnalysisError> {
    let request: AnalysisRequest = serde_json::from_str(request_json)
        .map_err(|e| AnalysisError::RequestParse(e.to_string()))?;

    let report = analyze_request(request)?;

    serde_json::to_string(&report).map_err(|e| AnalysisError::ResultSerialize(e.to_string()))
}

/// Runs one decoded request.
///
/// # Errors
/// - [`AnalysisError::RequestValidation`] for a blank symbol.
/// - [`AnalysisError::Config`] when the configuration is invalid.
/// - [`AnalysisError::Data`] when the bars are empty or malformed.
pub fn analyze_request(request: AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
    if request.symbol.trim().is_empty() {
        return Err(AnalysisError::RequestValidation("symbol is empty".to_string()));
    }

    let aggregator = Aggregator::new(request.config.unwrap_or_default())?;
    aggregator.analyze(&request.symbol, &PriceSeries::new(request.bars))
}

/// Fetches `symbol` over `range` from `source` and analyzes it.
///
/// # Errors
/// - [`AnalysisError::Data`] when the source cannot deliver the series.
/// - Any error from [`Aggregator::analyze`].
pub fn analyze_symbol(
    source: &dyn PriceSource,
    symbol: &str,
    range: DateRange,
    aggregator: &Aggregator,
) -> Result<AnalysisReport, AnalysisError> {
    let series = source.fetch(symbol, range)?;
    info!(symbol, bars = series.len(), start = %range.start, end = %range.end, "analyzing symbol");
    aggregator.analyze(symbol, &series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_symbol() {
        let result = run_analysis_from_json(
            r#"{"symbol": " ", "bars": [{"date": "2024-01-02", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 0.0}]}"#,
        );
        assert!(matches!(result, Err(AnalysisError::RequestValidation(_))));
    }

    #[test]
    fn test_rejects_undecodable_request() {
        let err = run_analysis_from_json(r#"{"symbol": "AAPL"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::RequestParse(_)));
        assert_eq!(err.error_category(), "request");
    }

    #[test]
    fn test_rejects_empty_bars() {
        let err = run_analysis_from_json(r#"{"symbol": "AAPL", "bars": []}"#).unwrap_err();
        assert!(err.is_malformed_input());
    }
}
