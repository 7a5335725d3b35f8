use serde::{Deserialize, Serialize};

use crate::constants::MAX_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// The two raw similarity signals, each a percentage in `[0, 100]`.
pub struct ScorePair {
    /// Embedding cosine similarity, rescaled to a percentage.
    pub semantic: f64,
    /// Cross-encoder sigmoid output, rescaled to a percentage.
    pub contextual: f64,
}

impl ScorePair {
    /// Creates a pair, clamping both signals into `[0, 100]`.
    pub fn new(semantic: f64, contextual: f64) -> Self {
        Self {
            semantic: clamp_score(semantic),
            contextual: clamp_score(contextual),
        }
    }

    /// The degenerate pair used when a page could not be scored.
    pub fn zero() -> Self {
        Self {
            semantic: 0.0,
            contextual: 0.0,
        }
    }

    /// Multiplies both signals by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.semantic * factor, self.contextual * factor)
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// An aggregated total on the `[0, 10]` scale.
pub struct Grade {
    /// Value before rounding.
    pub exact: f64,
    /// Nearest integer (ties to even), for display.
    pub rounded: f64,
}

impl Grade {
    /// Wraps an exact total and derives the rounded display value.
    pub fn from_exact(exact: f64) -> Self {
        Self {
            exact,
            rounded: exact.round_ties_even(),
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.4})", self.rounded, self.exact)
    }
}
