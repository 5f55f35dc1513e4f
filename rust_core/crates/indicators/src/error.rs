//! Indicator error types.

use thiserror::Error;

/// Errors that can occur during indicator computation or registry operations.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Unknown indicator name requested from registry
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Invalid parameters for the indicator
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Insufficient data for computation
    #[error("insufficient data: need {required} bars, got {actual}")]
    InsufficientData {
        /// Required number of bars.
        required: usize,
        /// Actual number of bars provided.
        actual: usize,
    },

    /// Enough bars, but the arithmetic left no finite latest value
    #[error("{indicator} is not finite at the last of {bars} bars")]
    NonFinite {
        /// Indicator key.
        indicator: String,
        /// Series length.
        bars: usize,
    },

    /// Parameter out of valid range
    #[error("parameter out of range: {param} = {value} (valid: {min}..{max})")]
    ParamOutOfRange {
        /// Parameter name.
        param: String,
        /// Parameter value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },
}

impl IndicatorError {
    /// Creates an `InvalidParams` error with a message.
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidParams(msg.into())
    }

    /// Creates an `InsufficientData` error.
    #[must_use]
    pub fn insufficient(required: usize, actual: usize) -> Self {
        IndicatorError::InsufficientData { required, actual }
    }

    /// Creates a `NonFinite` error.
    #[must_use]
    pub fn non_finite(indicator: impl Into<String>, bars: usize) -> Self {
        IndicatorError::NonFinite {
            indicator: indicator.into(),
            bars,
        }
    }

    /// Creates a `ParamOutOfRange` error.
    #[must_use]
    pub fn param_out_of_range(param: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        IndicatorError::ParamOutOfRange {
            param: param.into(),
            value,
            min,
            max,
        }
    }

    /// Returns `(required, actual)` when this is an insufficient-data error.
    #[must_use]
    pub fn as_insufficient(&self) -> Option<(usize, usize)> {
        match self {
            IndicatorError::InsufficientData { required, actual } => Some((*required, *actual)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_display_and_accessor() {
        let err = IndicatorError::insufficient(35, 3);
        assert_eq!(err.to_string(), "insufficient data: need 35 bars, got 3");
        assert_eq!(err.as_insufficient(), Some((35, 3)));
        assert_eq!(IndicatorError::invalid_params("x").as_insufficient(), None);
    }

    #[test]
    fn test_non_finite_is_not_insufficient() {
        let err = IndicatorError::non_finite("BOLL", 60);
        assert_eq!(err.to_string(), "BOLL is not finite at the last of 60 bars");
        assert_eq!(err.as_insufficient(), None);
    }
}
