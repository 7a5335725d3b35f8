use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum ComparisonError {
    /// Comparison attempted before a reference was loaded (or after reset).
    #[error("no reference answers loaded; upload the teacher answers first")]
    MissingReference,

    #[error("invalid aggregation weights: {reason}")]
    InvalidWeights { reason: String },

    /// A scoring worker thread panicked.
    #[error("scoring worker failed: {reason}")]
    WorkerFailed { reason: String },
}

impl From<ScoringError> for ComparisonError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidWeights { reason } => Self::InvalidWeights { reason },
            other => Self::WorkerFailed {
                reason: other.to_string(),
            },
        }
    }
}
