use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default sentence embedding dimension.
pub const SENTENCE_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default sentence embedder token limit.
pub const SENTENCE_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_EMBEDDER_MAX_SEQ_LEN;

/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
#[derive(Debug, Clone)]
pub struct SentenceEmbedderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` selects the deterministic stub backend.
    pub model_path: Option<PathBuf>,
    /// Max tokens fed to the encoder.
    pub max_seq_len: usize,
    /// Output dimension (must match the model's hidden size when a model is loaded).
    pub embedding_dim: usize,
}

impl Default for SentenceEmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: SENTENCE_MAX_SEQ_LEN,
            embedding_dim: SENTENCE_EMBEDDING_DIM,
        }
    }
}

impl SentenceEmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_PATH: &'static str = "GRADER_EMBEDDER_PATH";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; deterministic hashed embeddings).
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Returns `true` if no model directory is configured.
    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }

        Ok(())
    }

    /// Reads `GRADER_EMBEDDER_PATH` (unset or blank selects stub mode).
    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            ..Default::default()
        }
    }
}
