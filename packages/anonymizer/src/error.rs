//! Typed errors for the anonymizer library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure kind. An empty result is not an error.

use thiserror::Error;

/// Errors that can occur while aggregating or masking.
#[derive(Debug, Error)]
pub enum AnonymizeError {
    /// Required input missing or out of range
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Span is inverted, out of bounds, or overlaps a retained group
    #[error("malformed span [{start}, {end}): {reason}")]
    MalformedSpan {
        start: usize,
        end: usize,
        reason: String,
    },

    /// Prediction payload could not be parsed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnonymizeError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_span(start: usize, end: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSpan {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// True for `InvalidInput`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// True for `MalformedSpan`.
    pub fn is_malformed_span(&self) -> bool {
        matches!(self, Self::MalformedSpan { .. })
    }
}

/// Result type alias for anonymizer operations.
pub type Result<T> = std::result::Result<T, AnonymizeError>;
