//! Token classification records consumed by the aggregator.

use serde::{Deserialize, Serialize};

/// Half-open character span `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the two spans share at least one character.
    ///
    /// Touching spans (`a.end == b.start`) do not intersect.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One sub-word token emitted by the upstream classifier.
///
/// `is_boundary` and `is_special` are supplied by the producer; the engine
/// never inspects `text` to derive them. See [`crate::predictions`] for an
/// adapter that derives them from a tokenizer's marker convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default)]
    pub is_boundary: bool,
    #[serde(default)]
    pub is_special: bool,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl Token {
    /// A token that starts a new word.
    pub fn word(text: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            text: text.into(),
            is_boundary: true,
            is_special: false,
            start,
            end,
            score,
        }
    }

    /// A token that continues the current word.
    pub fn subword(text: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            is_boundary: false,
            ..Self::word(text, start, end, score)
        }
    }

    /// A sequence delimiter such as `[CLS]`. Carries no content.
    pub fn special(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_boundary: false,
            is_special: true,
            start: 0,
            end: 0,
            score: 0.0,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
