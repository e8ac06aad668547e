//! Text masking: replace each retained group's span with a placeholder.
//!
//! Groups are spliced right to left so that every span still to be
//! processed sits at its originally recorded offset. Offsets are character
//! offsets into the pristine original; they are mapped to byte offsets once
//! and stay valid in the working copy because everything left of the
//! current splice is untouched.

use tracing::debug;

use crate::error::{AnonymizeError, Result};
use crate::types::config::PlaceholderNumbering;
use crate::types::group::EntityGroup;
use crate::types::replacement::{placeholder, Replacement};
use crate::types::token::{Span, Token};

/// Mask `original_text` with right-to-left placeholder numbering.
///
/// Returns the masked text and the ledger in masking order.
pub fn mask(
    tokens: &[Token],
    groups: &[EntityGroup],
    original_text: Option<&str>,
) -> Result<(String, Vec<Replacement>)> {
    mask_with_numbering(tokens, groups, original_text, PlaceholderNumbering::RightToLeft)
}

/// Mask `original_text`, numbering placeholders per `numbering`.
///
/// Fails with `InvalidInput` when no text is given and with
/// `MalformedSpan` when any token or group span is inverted, runs past the
/// end of the text, or when two groups overlap. Nothing is spliced unless
/// every span checks out.
pub fn mask_with_numbering(
    tokens: &[Token],
    groups: &[EntityGroup],
    original_text: Option<&str>,
    numbering: PlaceholderNumbering,
) -> Result<(String, Vec<Replacement>)> {
    let text = original_text
        .ok_or_else(|| AnonymizeError::invalid_input("original text is required for masking"))?;

    let offsets = CharOffsets::new(text);

    for token in tokens.iter().filter(|t| !t.is_special) {
        offsets.check(token.span(), "token")?;
    }

    let mut sorted: Vec<&EntityGroup> = groups.iter().collect();
    sorted.sort_by_key(|g| (g.start(), g.end()));

    for group in &sorted {
        offsets.check(group.span(), "group")?;
    }
    for pair in sorted.windows(2) {
        let (left, right) = (pair[0].span(), pair[1].span());
        if right.start < left.end {
            return Err(AnonymizeError::malformed_span(
                right.start,
                right.end,
                format!("overlaps group [{}, {})", left.start, left.end),
            ));
        }
    }

    let total = sorted.len();
    let mut masked_text = text.to_string();
    let mut replacements = Vec::with_capacity(total);

    for (step, group) in sorted.iter().rev().enumerate() {
        let n = match numbering {
            PlaceholderNumbering::RightToLeft => step + 1,
            PlaceholderNumbering::LeftToRight => total - step,
        };
        let label = placeholder(n);
        let bytes = offsets.byte_range(group.span());

        let original = text[bytes.clone()].to_string();
        masked_text.replace_range(bytes, &label);

        replacements.push(Replacement {
            original,
            placeholder: label,
            confidence: group.max_score(),
        });
    }

    debug!(
        groups = total,
        original_len = text.len(),
        masked_len = masked_text.len(),
        %numbering,
        "masked text"
    );

    Ok((masked_text, replacements))
}

/// Byte offset of every character boundary in a string.
struct CharOffsets {
    bytes: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { bytes }
    }

    fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    fn check(&self, span: Span, what: &str) -> Result<()> {
        if span.is_inverted() {
            return Err(AnonymizeError::malformed_span(
                span.start,
                span.end,
                format!("{what} span has start after end"),
            ));
        }
        if span.end > self.char_len() {
            return Err(AnonymizeError::malformed_span(
                span.start,
                span.end,
                format!("{what} span exceeds text length {}", self.char_len()),
            ));
        }
        Ok(())
    }

    /// Caller must have passed `span` through `check`.
    fn byte_range(&self, span: Span) -> std::ops::Range<usize> {
        self.bytes[span.start]..self.bytes[span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(tokens: Vec<Token>) -> EntityGroup {
        EntityGroup::from_tokens(tokens).unwrap()
    }

    #[test]
    fn test_basic_mask() {
        let tokens = vec![
            Token::word("I", 0, 1, 0.1),
            Token::word("Ġam", 2, 4, 0.05),
            Token::word("Ġold", 5, 8, 0.9),
        ];
        let groups = vec![group(vec![tokens[2].clone()])];

        let (masked, ledger) = mask(&tokens, &groups, Some("I am old")).unwrap();

        assert_eq!(masked, "I am [PII_1]");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].original, "old");
        assert_eq!(ledger[0].placeholder, "[PII_1]");
        assert_eq!(ledger[0].confidence, 0.9);
    }

    #[test]
    fn test_missing_text_is_invalid_input() {
        let err = mask(&[], &[], None).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_no_groups_leaves_text_untouched() {
        let (masked, ledger) = mask(&[], &[], Some("nothing here")).unwrap();
        assert_eq!(masked, "nothing here");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_right_to_left_numbering() {
        let text = "Ann Bob";
        let groups = vec![
            group(vec![Token::word("Ann", 0, 3, 0.9)]),
            group(vec![Token::word("ĠBob", 4, 7, 0.8)]),
        ];

        let (masked, ledger) = mask(&[], &groups, Some(text)).unwrap();

        assert_eq!(masked, "[PII_2] [PII_1]");
        assert_eq!(ledger[0].original, "Bob");
        assert_eq!(ledger[0].placeholder, "[PII_1]");
        assert_eq!(ledger[1].original, "Ann");
        assert_eq!(ledger[1].placeholder, "[PII_2]");
    }

    #[test]
    fn test_left_to_right_numbering() {
        let text = "Ann Bob";
        let groups = vec![
            group(vec![Token::word("Ann", 0, 3, 0.9)]),
            group(vec![Token::word("ĠBob", 4, 7, 0.8)]),
        ];

        let (masked, ledger) =
            mask_with_numbering(&[], &groups, Some(text), PlaceholderNumbering::LeftToRight)
                .unwrap();

        assert_eq!(masked, "[PII_1] [PII_2]");
        // Ledger stays in masking order.
        assert_eq!(ledger[0].original, "Bob");
        assert_eq!(ledger[0].placeholder, "[PII_2]");
    }

    #[test]
    fn test_unsorted_groups_are_sorted() {
        let text = "Ann Bob";
        let groups = vec![
            group(vec![Token::word("ĠBob", 4, 7, 0.8)]),
            group(vec![Token::word("Ann", 0, 3, 0.9)]),
        ];

        let (masked, ledger) = mask(&[], &groups, Some(text)).unwrap();

        assert_eq!(masked, "[PII_2] [PII_1]");
        assert_eq!(ledger[0].original, "Bob");
    }

    #[test]
    fn test_adjacent_groups() {
        let text = "AnnBob";
        let groups = vec![
            group(vec![Token::word("Ann", 0, 3, 0.9)]),
            group(vec![Token::word("Bob", 3, 6, 0.9)]),
        ];

        let (masked, _) = mask(&[], &groups, Some(text)).unwrap();
        assert_eq!(masked, "[PII_2][PII_1]");
    }

    #[test]
    fn test_span_past_end_is_malformed() {
        let groups = vec![group(vec![Token::word("Ġold", 4, 9, 0.9)])];
        let err = mask(&[], &groups, Some("I am old")).unwrap_err();
        assert!(err.is_malformed_span());
    }

    #[test]
    fn test_token_past_end_is_malformed() {
        let tokens = vec![Token::word("Ġx", 0, 40, 0.1)];
        let err = mask(&tokens, &[], Some("short")).unwrap_err();
        assert!(err.is_malformed_span());
    }

    #[test]
    fn test_special_token_offsets_ignored() {
        let mut sep = Token::special("[SEP]");
        sep.start = 100;
        sep.end = 100;
        let (masked, _) = mask(&[sep], &[], Some("short")).unwrap();
        assert_eq!(masked, "short");
    }

    #[test]
    fn test_overlapping_groups_are_malformed() {
        let groups = vec![
            group(vec![Token::word("abc", 0, 3, 0.9)]),
            group(vec![Token::word("cd", 2, 4, 0.9)]),
        ];
        let err = mask(&[], &groups, Some("abcdef")).unwrap_err();
        assert!(err.is_malformed_span());
    }

    #[test]
    fn test_multibyte_text_uses_char_offsets() {
        // "Zoë lives in Köln": chars, not bytes
        let text = "Zoë lives in Köln";
        let groups = vec![
            group(vec![Token::word("Zoë", 0, 3, 0.9)]),
            group(vec![Token::word("ĠKöln", 13, 17, 0.9)]),
        ];

        let (masked, ledger) = mask(&[], &groups, Some(text)).unwrap();

        assert_eq!(masked, "[PII_2] lives in [PII_1]");
        assert_eq!(ledger[0].original, "Köln");
        assert_eq!(ledger[1].original, "Zoë");
    }

    #[test]
    fn test_empty_text_with_empty_span() {
        let groups = vec![group(vec![Token::word("", 0, 0, 0.9)])];
        let (masked, ledger) = mask(&[], &groups, Some("")).unwrap();
        assert_eq!(masked, "[PII_1]");
        assert_eq!(ledger[0].original, "");
    }
}
