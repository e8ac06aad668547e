//! Span aggregation and text masking over token classification output.
//!
//! Given a sequence of sub-word tokens (each with a character span and a
//! confidence score) and the source text, the anonymizer:
//!
//! 1. merges sub-word tokens into whole-word entity groups,
//! 2. keeps groups whose best score reaches the threshold,
//! 3. replaces each kept group's span with a numbered placeholder and
//!    records what was replaced.
//!
//! Model inference is not part of this crate; callers supply the token
//! sequence, either directly as [`Token`]s or as raw [`TokenPrediction`]s
//! classified by a [`BoundaryConvention`].
//!
//! # Usage
//!
//! ```rust
//! use anonymizer::{Anonymizer, AnonymizerConfig, Token};
//!
//! let tokens = vec![
//!     Token::word("I", 0, 1, 0.1),
//!     Token::word("Ġam", 2, 4, 0.05),
//!     Token::word("Ġold", 5, 8, 0.9),
//! ];
//!
//! let anonymizer = Anonymizer::new(AnonymizerConfig::default()).unwrap();
//! let result = anonymizer.anonymize(&tokens, "I am old").unwrap();
//!
//! assert_eq!(result.masked_text, "I am [PII_1]");
//! assert_eq!(result.replacements[0].original, "old");
//! ```
//!
//! # Modules
//!
//! - [`aggregator`] - Word grouping and threshold filtering
//! - [`masker`] - Right-to-left placeholder splicing
//! - [`pipeline`] - Single-document and batch entry points
//! - [`predictions`] - Adapter from raw classifier output
//! - [`types`] - Tokens, groups, replacements, configuration

pub mod aggregator;
pub mod error;
pub mod masker;
pub mod pipeline;
pub mod predictions;
pub mod types;

pub use aggregator::aggregate;
pub use error::{AnonymizeError, Result};
pub use masker::{mask, mask_with_numbering};
pub use pipeline::{anonymize, anonymize_batch, Anonymizer, Document};
pub use predictions::{
    parse_predictions, tokens_from_predictions, BoundaryConvention, BoundaryMarker,
    PredictionDocument, TokenPrediction,
};
pub use types::{
    config::{AnonymizerConfig, PlaceholderNumbering, DEFAULT_THRESHOLD},
    group::EntityGroup,
    replacement::{placeholder, AnonymizationResult, Replacement},
    token::{Span, Token},
};
