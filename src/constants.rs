//! Cross-cutting, shared constants.
//!
//! Scores travel through the pipeline as percentages in `[0, 100]`; totals are
//! on a `[0, 10]` scale under every aggregation profile.

/// Output dimension of the default sentence embedder (MiniLM-L6 class models).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token limit for the sentence embedder.
pub const DEFAULT_EMBEDDER_MAX_SEQ_LEN: usize = 256;

/// Token limit for the cross-encoder (question + answer pair).
pub const DEFAULT_CROSS_ENCODER_MAX_SEQ_LEN: usize = 512;

/// Default weight of the semantic score in the weighted-mean profile.
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;

/// Default weight of the contextual score in the weighted-mean profile.
pub const DEFAULT_CONTEXTUAL_WEIGHT: f64 = 0.6;

/// Multiplier applied to both scores when negation polarity differs.
pub const NEGATION_PENALTY_FACTOR: f64 = 0.5;

/// Upper bound of a single similarity score.
pub const MAX_SCORE: f64 = 100.0;

/// Upper bound of an aggregated total.
pub const MAX_TOTAL: f64 = 10.0;

/// Tolerance used when checking that weights sum to at most one.
pub const WEIGHT_EPSILON: f64 = 1e-9;
