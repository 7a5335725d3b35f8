use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the sentence embedder.
///
/// Empty input is never an error: it embeds to the zero vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The configured model directory (or one of its files) is missing.
    #[error("embedding model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    /// Weights or model config could not be read.
    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    /// The forward pass or pooling failed.
    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    /// The tokenizer rejected the input or could not be loaded.
    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    /// Model produced vectors of a different width than configured.
    #[error("embedding dimension mismatch: expected {expected}, model produces {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration rejected by `validate()`.
    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
