use thiserror::Error;

use crate::embedding::{CrossEncoderError, EmbeddingError};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("cross-encoder error: {0}")]
    CrossEncoder(#[from] CrossEncoderError),

    #[error("invalid aggregation weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
