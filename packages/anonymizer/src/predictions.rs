//! Adapter from raw token-classification output to [`Token`] records.
//!
//! Classifiers report sub-word surface forms (`"Ġold"`, `"##don"`) rather
//! than explicit word boundaries. This module owns the tokenizer-specific
//! marker convention so the aggregator only ever reads `is_boundary` and
//! `is_special`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnonymizeError, Result};
use crate::pipeline::Document;
use crate::types::token::Token;

/// One prediction as emitted by a token-classification model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrediction {
    pub word: String,
    pub score: f64,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// How a tokenizer marks word boundaries in its surface forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryMarker {
    /// Prefixed tokens start a word (byte-level BPE `Ġ`, SentencePiece `▁`).
    WordStartPrefix(String),
    /// Prefixed tokens continue a word (WordPiece `##`).
    ContinuationPrefix(String),
}

/// Marker and special-token set used to classify predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConvention {
    pub marker: BoundaryMarker,
    pub special_tokens: Vec<String>,
}

impl Default for BoundaryConvention {
    fn default() -> Self {
        Self::byte_level()
    }
}

impl BoundaryConvention {
    /// Byte-level BPE: `Ġ` marks a word start.
    pub fn byte_level() -> Self {
        Self::with_marker(BoundaryMarker::WordStartPrefix("Ġ".to_string()))
    }

    /// SentencePiece: `▁` marks a word start.
    pub fn sentencepiece() -> Self {
        Self::with_marker(BoundaryMarker::WordStartPrefix("▁".to_string()))
    }

    /// WordPiece: `##` marks a continuation.
    pub fn wordpiece() -> Self {
        Self::with_marker(BoundaryMarker::ContinuationPrefix("##".to_string()))
    }

    fn with_marker(marker: BoundaryMarker) -> Self {
        Self {
            marker,
            special_tokens: vec!["[CLS]".to_string(), "[SEP]".to_string()],
        }
    }

    /// Replace the special-token set.
    pub fn with_special_tokens(mut self, tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.special_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_special(&self, word: &str) -> bool {
        self.special_tokens.iter().any(|s| s == word)
    }

    pub fn is_boundary(&self, word: &str) -> bool {
        match &self.marker {
            BoundaryMarker::WordStartPrefix(prefix) => word.starts_with(prefix.as_str()),
            BoundaryMarker::ContinuationPrefix(prefix) => !word.starts_with(prefix.as_str()),
        }
    }

    /// Classify one prediction.
    ///
    /// Special tokens carry no offsets of their own; any other prediction
    /// without offsets is rejected.
    pub fn to_token(&self, prediction: &TokenPrediction) -> Result<Token> {
        if self.is_special(&prediction.word) {
            return Ok(Token::special(prediction.word.clone()));
        }

        let (start, end) = match (prediction.start, prediction.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AnonymizeError::invalid_input(format!(
                    "prediction {:?} has no offsets",
                    prediction.word
                )));
            }
        };

        Ok(Token {
            text: prediction.word.clone(),
            is_boundary: self.is_boundary(&prediction.word),
            is_special: false,
            start,
            end,
            score: prediction.score,
        })
    }
}

impl FromStr for BoundaryConvention {
    type Err = AnonymizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "byte-level" | "bpe" => Ok(Self::byte_level()),
            "sentencepiece" | "spm" => Ok(Self::sentencepiece()),
            "wordpiece" => Ok(Self::wordpiece()),
            other => Err(AnonymizeError::invalid_input(format!(
                "unknown boundary convention: {other}"
            ))),
        }
    }
}

/// Convert predictions to tokens, preserving order.
pub fn tokens_from_predictions(
    predictions: &[TokenPrediction],
    convention: &BoundaryConvention,
) -> Result<Vec<Token>> {
    predictions.iter().map(|p| convention.to_token(p)).collect()
}

/// Parse a JSON array of predictions.
pub fn parse_predictions(json: &str) -> Result<Vec<TokenPrediction>> {
    Ok(serde_json::from_str(json)?)
}

/// A source text paired with its raw predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDocument {
    #[serde(default)]
    pub text: Option<String>,
    pub tokens: Vec<TokenPrediction>,
}

impl PredictionDocument {
    pub fn into_document(self, convention: &BoundaryConvention) -> Result<Document> {
        Ok(Document {
            tokens: tokens_from_predictions(&self.tokens, convention)?,
            text: self.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(word: &str, start: usize, end: usize, score: f64) -> TokenPrediction {
        TokenPrediction {
            word: word.to_string(),
            score,
            start: Some(start),
            end: Some(end),
            entity: None,
            index: None,
        }
    }

    #[test]
    fn test_byte_level_marker() {
        let convention = BoundaryConvention::byte_level();
        assert!(convention.is_boundary("Ġold"));
        assert!(!convention.is_boundary("don"));
        assert!(!convention.is_boundary("I"));
    }

    #[test]
    fn test_wordpiece_marker() {
        let convention = BoundaryConvention::wordpiece();
        assert!(convention.is_boundary("Lon"));
        assert!(!convention.is_boundary("##don"));
    }

    #[test]
    fn test_sentencepiece_marker() {
        let convention = BoundaryConvention::sentencepiece();
        assert!(convention.is_boundary("▁London"));
        assert!(!convention.is_boundary("er"));
    }

    #[test]
    fn test_special_tokens() {
        let convention = BoundaryConvention::default();
        let token = convention
            .to_token(&TokenPrediction {
                word: "[CLS]".into(),
                score: 0.99,
                start: None,
                end: None,
                entity: None,
                index: Some(0),
            })
            .unwrap();
        assert!(token.is_special);
        assert!(!token.is_boundary);

        let custom = BoundaryConvention::default().with_special_tokens(["<s>", "</s>"]);
        assert!(custom.is_special("</s>"));
        assert!(!custom.is_special("[CLS]"));
    }

    #[test]
    fn test_missing_offsets_rejected() {
        let convention = BoundaryConvention::default();
        let err = convention
            .to_token(&TokenPrediction {
                start: None,
                ..prediction("Ġold", 0, 0, 0.5)
            })
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_tokens_from_predictions() {
        let predictions = vec![
            prediction("I", 0, 1, 0.1),
            prediction("Ġam", 2, 4, 0.05),
            prediction("Ġold", 5, 8, 0.9),
        ];

        let tokens = tokens_from_predictions(&predictions, &BoundaryConvention::default()).unwrap();

        assert_eq!(tokens.len(), 3);
        assert!(!tokens[0].is_boundary);
        assert!(tokens[1].is_boundary);
        assert_eq!(tokens[2].text, "Ġold");
        assert_eq!(tokens[2].score, 0.9);
    }

    #[test]
    fn test_parse_predictions() {
        let json = r#"[
            {"entity": "B-AGE", "score": 0.91, "index": 3, "word": "Ġold", "start": 5, "end": 8}
        ]"#;

        let predictions = parse_predictions(json).unwrap();

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].entity.as_deref(), Some("B-AGE"));
        assert_eq!(predictions[0].start, Some(5));
    }

    #[test]
    fn test_parse_predictions_rejects_garbage() {
        let err = parse_predictions("not json").unwrap_err();
        assert!(matches!(err, AnonymizeError::Json(_)));
    }

    #[test]
    fn test_convention_from_str() {
        assert_eq!(
            "wordpiece".parse::<BoundaryConvention>().unwrap(),
            BoundaryConvention::wordpiece()
        );
        assert_eq!(
            "BPE".parse::<BoundaryConvention>().unwrap(),
            BoundaryConvention::byte_level()
        );
        assert!("morse".parse::<BoundaryConvention>().is_err());
    }
}
