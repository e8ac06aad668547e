//! Aggregate-then-mask pipeline over single documents and batches.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregator::aggregate;
use crate::error::{AnonymizeError, Result};
use crate::masker::mask_with_numbering;
use crate::types::config::AnonymizerConfig;
use crate::types::replacement::AnonymizationResult;
use crate::types::token::Token;

/// A source text with the classifier output for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub text: Option<String>,
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: Some(text.into()),
            tokens,
        }
    }
}

/// Run aggregation and masking for one document.
///
/// Validates `config` and requires `original_text`; both failures surface
/// as `InvalidInput` before any work is done.
pub fn anonymize(
    tokens: &[Token],
    original_text: Option<&str>,
    config: &AnonymizerConfig,
) -> Result<AnonymizationResult> {
    config.validate()?;
    let text = original_text.ok_or_else(|| {
        AnonymizeError::invalid_input("original text is required for anonymization")
    })?;

    let groups = aggregate(tokens, config.threshold)?;
    let (masked_text, replacements) =
        mask_with_numbering(tokens, &groups, Some(text), config.numbering)?;

    Ok(AnonymizationResult {
        masked_text,
        replacements,
        original_text: text.to_string(),
    })
}

/// Anonymize each document independently.
///
/// Every row gets its own placeholder counter and its own result; a failed
/// row does not affect the others.
pub fn anonymize_batch(
    documents: &[Document],
    config: &AnonymizerConfig,
) -> Vec<Result<AnonymizationResult>> {
    let results: Vec<_> = documents
        .iter()
        .enumerate()
        .map(|(row, doc)| {
            anonymize(&doc.tokens, doc.text.as_deref(), config).inspect_err(|e| {
                warn!(row, error = %e, "failed to anonymize row");
            })
        })
        .collect();

    debug!(
        rows = documents.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "anonymized batch"
    );

    results
}

/// Anonymizer bound to a validated configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anonymizer {
    config: AnonymizerConfig,
}

impl Anonymizer {
    pub fn new(config: AnonymizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    pub fn anonymize(&self, tokens: &[Token], original_text: &str) -> Result<AnonymizationResult> {
        anonymize(tokens, Some(original_text), &self.config)
    }

    pub fn anonymize_document(&self, document: &Document) -> Result<AnonymizationResult> {
        anonymize(&document.tokens, document.text.as_deref(), &self.config)
    }

    pub fn anonymize_batch(&self, documents: &[Document]) -> Vec<Result<AnonymizationResult>> {
        anonymize_batch(documents, &self.config)
    }
}
