//! Entity groups: contiguous runs of sub-word tokens forming one word.

use serde::Serialize;

use super::token::{Span, Token};
use crate::error::{AnonymizeError, Result};

/// A merged run of tokens representing one candidate sensitive span.
///
/// Immutable once built. The span runs from the first token's start to the
/// last token's end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityGroup {
    tokens: Vec<Token>,
    span: Span,
    max_score: f64,
}

impl EntityGroup {
    /// Build a group from an ordered, non-empty run of tokens.
    ///
    /// Fails with `MalformedSpan` if any token span is inverted or the
    /// resulting group span would be.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self> {
        let (first, last) = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnonymizeError::invalid_input("entity group has no tokens")),
        };

        if let Some(bad) = tokens.iter().find(|t| t.span().is_inverted()) {
            return Err(AnonymizeError::malformed_span(
                bad.start,
                bad.end,
                format!("token {:?} has start after end", bad.text),
            ));
        }

        let span = Span::new(first.start, last.end);
        if span.is_inverted() {
            return Err(AnonymizeError::malformed_span(
                span.start,
                span.end,
                "group tokens are not in text order",
            ));
        }

        let max_score = tokens
            .iter()
            .map(|t| t.score)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            tokens,
            span,
            max_score,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}
