use tracing::debug;

use crate::constants::NEGATION_PENALTY_FACTOR;
use crate::text::has_negation;

use super::types::ScorePair;

/// Returns `true` when exactly one of the raw texts is negated.
///
/// Symmetric in its arguments. Negation scope is not resolved, so "not
/// uncommon" reads as negated.
pub fn polarity_mismatch(student_text: &str, teacher_text: &str) -> bool {
    has_negation(student_text) != has_negation(teacher_text)
}

/// Halves both signals when the raw texts disagree on negation polarity.
///
/// Must be given the raw (pre-normalization) texts: the stopword list drops
/// `not`/`no`/`nor`.
pub fn apply_penalty(scores: ScorePair, student_text: &str, teacher_text: &str) -> ScorePair {
    if polarity_mismatch(student_text, teacher_text) {
        debug!(
            semantic = scores.semantic,
            contextual = scores.contextual,
            "Negation polarity mismatch, penalizing scores"
        );
        scores.scaled(NEGATION_PENALTY_FACTOR)
    } else {
        scores
    }
}
