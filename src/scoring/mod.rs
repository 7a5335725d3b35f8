//! Answer-pair scoring: similarity signals, negation penalty, aggregation.
//!
//! Per page the pipeline is
//! [`SimilarityScorer::score`] → [`apply_penalty`] → [`AggregationProfile::aggregate`].
//!
//! # Negation heuristic
//!
//! [`apply_penalty`] halves both signals whenever exactly one raw text
//! contains a negation marker. It does not resolve scope or double negation
//! ("not uncommon" counts as negated); that is a known limitation of the
//! policy, not a defect.

pub mod aggregate;
pub mod error;
pub mod penalty;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregationProfile, Weights, aggregate};
pub use error::ScoringError;
pub use penalty::{apply_penalty, polarity_mismatch};
pub use scorer::{SimilarityScorer, cosine_similarity};
pub use types::{Grade, ScorePair};
