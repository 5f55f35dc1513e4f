//! Analysis error types.

use stockscope_data::DataError;
use stockscope_indicators::IndicatorError;
use stockscope_types::CoreError;
use thiserror::Error;

/// Errors that can occur while turning a request into an analysis report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Request JSON could not be decoded
    #[error("request parse error: {0}")]
    RequestParse(String),

    /// Request decoded but carries unusable values
    #[error("request validation error: {0}")]
    RequestValidation(String),

    /// Configuration parse or validation error
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// Price data missing, unreadable or malformed
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// A calculator failed for a reason other than missing bars
    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    /// Report serialization error
    #[error("result serialization error: {0}")]
    ResultSerialize(String),
}

impl AnalysisError {
    /// True when the price series itself was rejected.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, AnalysisError::Data(err) if err.is_malformed_input())
    }

    /// Error category for callers that report failures as data.
    /// Categories: `request`, `config`, `market_data`, `runtime`
    #[must_use]
    pub fn error_category(&self) -> &'static str {
        match self {
            AnalysisError::RequestParse(_) | AnalysisError::RequestValidation(_) => "request",
            AnalysisError::Config(_) => "config",
            AnalysisError::Data(_) => "market_data",
            AnalysisError::Indicator(_) | AnalysisError::ResultSerialize(_) => "runtime",
        }
    }
}
