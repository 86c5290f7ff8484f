//! Error types for the anofox-seasonality library.

use thiserror::Error;

/// Result type alias for decomposition and detection operations.
pub type Result<T> = std::result::Result<T, SeasonalityError>;

/// Errors that can occur while configuring or running a decomposition.
///
/// Zero-variance input is deliberately not represented here: strength
/// scores clamp to 0 instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeasonalityError {
    /// Input series is empty.
    #[error("empty input data")]
    EmptyData,

    /// Series too short for the requested period or smoother spans.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Builder or smoother parameters rejected before touching any data.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Parallel arrays of different lengths.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl SeasonalityError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SeasonalityError::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = SeasonalityError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = SeasonalityError::InsufficientData { needed: 8, got: 3 };
        assert_eq!(err.to_string(), "insufficient data: need at least 8, got 3");

        let err = SeasonalityError::config("period must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid configuration: period must be at least 2"
        );

        let err = SeasonalityError::DimensionMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 4, got 3");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = SeasonalityError::InsufficientData { needed: 2, got: 1 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, SeasonalityError::EmptyData);
    }
}
