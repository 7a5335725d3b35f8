use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTEXTUAL_WEIGHT, DEFAULT_SEMANTIC_WEIGHT, MAX_SCORE, MAX_TOTAL, WEIGHT_EPSILON,
};

use super::error::ScoringError;
use super::types::{Grade, ScorePair};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// `(W1, W2)` for the weighted-mean profile.
pub struct Weights {
    /// Weight of the semantic score.
    pub semantic: f64,
    /// Weight of the contextual score.
    pub contextual: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            semantic: DEFAULT_SEMANTIC_WEIGHT,
            contextual: DEFAULT_CONTEXTUAL_WEIGHT,
        }
    }
}

impl Weights {
    /// Creates a validated weight pair.
    pub fn new(semantic: f64, contextual: f64) -> Result<Self, ScoringError> {
        let weights = Self {
            semantic,
            contextual,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Checks the weights are finite, non-negative and sum to a value in `(0, 1]`.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [("semantic", self.semantic), ("contextual", self.contextual)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidWeights {
                    reason: format!("{name} weight must be a finite non-negative number, got {value}"),
                });
            }
        }

        let sum = self.semantic + self.contextual;
        if sum <= 0.0 || sum > 1.0 + WEIGHT_EPSILON {
            return Err(ScoringError::InvalidWeights {
                reason: format!("weights must sum to a value in (0, 1], got {sum}"),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
/// Strategy for combining a [`ScorePair`] into one total on `[0, 10]`.
///
/// The two variants are numerically distinct for the same input and serve
/// different consumers, so neither is expressed in terms of the other.
pub enum AggregationProfile {
    /// `10 * (W1 * semantic/100 + W2 * contextual/100)`; the display profile.
    WeightedMean(Weights),
    /// `(0.5 * semantic + 0.5 * contextual) / 10`; the API profile.
    EqualMeanScaled,
}

impl Default for AggregationProfile {
    fn default() -> Self {
        Self::display()
    }
}

impl AggregationProfile {
    /// Weighted mean with the default `(0.4, 0.6)` weights.
    pub fn display() -> Self {
        Self::WeightedMean(Weights::default())
    }

    /// Equal mean of the raw percentages, scaled down by ten.
    pub fn api() -> Self {
        Self::EqualMeanScaled
    }

    /// Short identifier used in logs and stored reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WeightedMean(_) => "weighted_mean",
            Self::EqualMeanScaled => "equal_mean_scaled",
        }
    }

    /// Combines `scores` into a bounded total.
    pub fn aggregate(&self, scores: ScorePair) -> Grade {
        let exact = match self {
            Self::WeightedMean(weights) => {
                let semantic_norm = scores.semantic / MAX_SCORE;
                let contextual_norm = scores.contextual / MAX_SCORE;
                MAX_TOTAL * (weights.semantic * semantic_norm + weights.contextual * contextual_norm)
            }
            Self::EqualMeanScaled => (0.5 * scores.semantic + 0.5 * scores.contextual) / 10.0,
        };

        Grade::from_exact(exact.clamp(0.0, MAX_TOTAL))
    }
}

impl std::fmt::Display for AggregationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Combines `scores` with `profile`.
pub fn aggregate(scores: ScorePair, profile: &AggregationProfile) -> Grade {
    profile.aggregate(scores)
}
