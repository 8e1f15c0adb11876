//! Error types for CDEEPSO operations.
//!
//! Configuration problems are the only failures the optimizer reports; once a
//! run has started it always terminates through budget exhaustion.

use thiserror::Error;

/// Result type alias for fallible CDEEPSO operations.
pub type Result<T> = std::result::Result<T, CdeepsoError>;

/// Main error type for CDEEPSO operations.
///
/// # Examples
///
/// ```
/// use cdeepso::error::CdeepsoError;
///
/// let err = CdeepsoError::invalid("strategy", "WORST", "one of RAND, BEST");
/// assert!(err.to_string().contains("strategy"));
/// ```
#[derive(Debug, Error)]
pub enum CdeepsoError {
    /// A configuration field holds an unknown name or an out-of-range value.
    #[error("invalid configuration: {field} = {value:?} (expected {expected})")]
    InvalidConfiguration {
        /// Offending field
        field: String,
        /// Value that was rejected
        value: String,
        /// Accepted values or range
        expected: String,
    },

    /// Matrix or vector dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// I/O error while reading or writing configuration and reports.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool for parallel trials could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CdeepsoError {
    /// Build an [`CdeepsoError::InvalidConfiguration`] naming the offending field.
    pub fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Name of the configuration field this error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidConfiguration { field, .. } => Some(field),
            _ => None,
        }
    }
}
