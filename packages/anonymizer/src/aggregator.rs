//! Span aggregation: merge sub-word tokens into whole-word entity groups.
//!
//! A single left-to-right pass. A group opens at a boundary-marked token
//! (or at index 0, which carries no marker by convention) and absorbs every
//! following token until the next boundary-marked or special token. Groups
//! whose best score falls below the threshold are dropped whole.

use tracing::{debug, trace};

use crate::error::{AnonymizeError, Result};
use crate::types::group::EntityGroup;
use crate::types::token::Token;

/// Group `tokens` into words and keep those scoring at least `threshold`.
///
/// Fails with `InvalidInput` for a NaN or negative threshold. A threshold
/// above 1.0 is accepted and keeps nothing; the upper bound is enforced by
/// [`crate::AnonymizerConfig::validate`].
pub fn aggregate(tokens: &[Token], threshold: f64) -> Result<Vec<EntityGroup>> {
    if threshold.is_nan() {
        return Err(AnonymizeError::invalid_input("threshold is NaN"));
    }
    if threshold < 0.0 {
        return Err(AnonymizeError::invalid_input(format!(
            "threshold must not be negative, got {threshold}"
        )));
    }

    let mut groups = Vec::new();
    let mut discarded = 0usize;
    let mut i = 0;
    let n = tokens.len();

    while i < n {
        let token = &tokens[i];
        if token.is_special {
            i += 1;
            continue;
        }

        let is_first_word = i == 0 && groups.is_empty();
        if !(token.is_boundary || is_first_word) {
            trace!(index = i, "dropping token outside any word");
            i += 1;
            continue;
        }

        let open = i;
        i += 1;
        while i < n && !tokens[i].is_boundary && !tokens[i].is_special {
            i += 1;
        }

        let group = EntityGroup::from_tokens(tokens[open..i].to_vec())?;
        if group.max_score() >= threshold {
            groups.push(group);
        } else {
            trace!(
                start = group.start(),
                end = group.end(),
                max_score = group.max_score(),
                "discarding group below threshold"
            );
            discarded += 1;
        }
    }

    debug!(
        tokens = n,
        kept = groups.len(),
        discarded,
        threshold,
        "aggregated tokens into groups"
    );

    Ok(groups)
}
