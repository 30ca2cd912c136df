//! Error types for coordination analysis.
//!
//! Every failure here is an input problem: shape or length mismatches,
//! unrecognized option strings, or malformed matrix buffers. Degenerate
//! numerical results (zero total variance and the like) are NOT errors and
//! surface as NaN values instead.

use thiserror::Error;

/// Main error type for coordination analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IscError {
    /// Two series that must share a time base have different lengths.
    #[error("Length mismatch for {series}: expected {expected} samples, got {actual}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Series has too few samples for the requested computation.
    #[error("Series too short: need at least {min} samples, got {actual}")]
    SeriesTooShort { min: usize, actual: usize },

    /// Body side string not recognized.
    #[error("Unknown side {0:?}: expected \"L\", \"R\", \"Left\" or \"Right\"")]
    UnknownSide(String),

    /// Shape metric identifier not recognized.
    #[error("Unknown metric {0:?}: expected one of LI, PI, PVPC2, Eccent, Pearson, U, u3, u3t")]
    UnknownMetric(String),

    /// Flat matrix buffer does not hold a whole number of 3x3 matrices.
    #[error("Malformed orientation buffer: length {len} is not a multiple of 9")]
    MalformedMatrix { len: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for coordination analysis.
pub type Result<T> = std::result::Result<T, IscError>;

impl IscError {
    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(series: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            series,
            expected,
            actual,
        }
    }

    /// Create a series too short error.
    #[must_use]
    pub const fn series_too_short(min: usize, actual: usize) -> Self {
        Self::SeriesTooShort { min, actual }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
