//! Configuration for the anonymization pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnonymizeError, Result};

/// Default minimum group score for masking.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Order in which placeholder numbers are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderNumbering {
    /// Numbered in masking order: the rightmost entity gets `[PII_1]`.
    #[default]
    RightToLeft,
    /// Numbered in reading order: the leftmost entity gets `[PII_1]`.
    /// Splicing still runs right to left.
    LeftToRight,
}

impl fmt::Display for PlaceholderNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RightToLeft => write!(f, "right-to-left"),
            Self::LeftToRight => write!(f, "left-to-right"),
        }
    }
}

impl FromStr for PlaceholderNumbering {
    type Err = AnonymizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right-to-left" | "rtl" => Ok(Self::RightToLeft),
            "left-to-right" | "ltr" => Ok(Self::LeftToRight),
            other => Err(AnonymizeError::invalid_input(format!(
                "unknown placeholder numbering: {other}"
            ))),
        }
    }
}

/// Configuration for [`crate::Anonymizer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Minimum group score (inclusive) for a group to be masked.
    ///
    /// Must lie in `[0, 1]`. Default: 0.3.
    pub threshold: f64,

    /// Placeholder numbering order.
    ///
    /// Default: `RightToLeft`.
    #[serde(default)]
    pub numbering: PlaceholderNumbering,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            numbering: PlaceholderNumbering::default(),
        }
    }
}

impl AnonymizerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set placeholder numbering order.
    pub fn with_numbering(mut self, numbering: PlaceholderNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Reject thresholds that are NaN or outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AnonymizeError::invalid_input(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
