//! Replacement ledger records and the pipeline result.

use serde::{Deserialize, Serialize};

const PLACEHOLDER_PREFIX: &str = "[PII_";
const PLACEHOLDER_SUFFIX: &str = "]";

/// Build the placeholder label for the `n`th masked entity (1-based).
pub fn placeholder(n: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{n}{PLACEHOLDER_SUFFIX}")
}

/// One masked span. Serialises as a ledger row with columns
/// `original`, `placeholder`, `confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    /// Exact substring of the original text
    pub original: String,
    /// Label substituted into the masked text, e.g. `[PII_1]`
    pub placeholder: String,
    /// The group's maximum token score
    pub confidence: f64,
}

impl Replacement {
    /// Numeric part of the placeholder label.
    pub fn number(&self) -> Option<usize> {
        self.placeholder
            .strip_prefix(PLACEHOLDER_PREFIX)?
            .strip_suffix(PLACEHOLDER_SUFFIX)?
            .parse()
            .ok()
    }
}

/// Output of one anonymization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub masked_text: String,
    /// Ledger in masking order (right to left across the text)
    pub replacements: Vec<Replacement>,
    pub original_text: String,
}

impl AnonymizationResult {
    pub fn is_unchanged(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Human-readable ledger, one line per replacement.
    pub fn summary_lines(&self) -> Vec<String> {
        self.replacements
            .iter()
            .map(|r| {
                format!(
                    "{} -> {} (score: {:.4})",
                    r.original, r.placeholder, r.confidence
                )
            })
            .collect()
    }
}
