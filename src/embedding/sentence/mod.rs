//! Sentence embedder (BERT-family bi-encoder + mean pooling).
//!
//! Use [`SentenceEmbedderConfig::stub`] for tests and model-less deployments:
//! the stub hashes whitespace tokens into a fixed-width bag-of-words vector,
//! so identical token sets embed identically and disjoint ones are near
//! orthogonal.

/// Sentence embedder configuration.
pub mod config;


pub use config::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceEmbedderConfig};

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::TextEmbedder;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{load_tokenizer_with_truncation, missing_model_file};

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Embeds normalized answer text into unit-length dense vectors.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceEmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder (stub mode when no model path is configured).
    pub fn load(config: SentenceEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!("Sentence embedder running in STUB mode (no model path configured)");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        if !model_path.is_dir() {
            return Err(EmbeddingError::ModelNotFound { path: model_path });
        }
        if let Some(missing) = missing_model_file(&model_path) {
            return Err(EmbeddingError::ModelNotFound { path: missing });
        }

        let device = select_device("sentence-embedder");
        debug!(?device, "Selected compute device for sentence embedder");

        info!(
            model_path = %model_path.display(),
            max_seq_len = config.max_seq_len,
            "Loading sentence embedding model"
        );

        let encoder = BertEncoder::load(&model_path, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        if encoder.hidden_size() != config.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: config.embedding_dim,
                actual: encoder.hidden_size(),
            });
        }

        let tokenizer = load_tokenizer_with_truncation(&model_path, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(
            embedding_dim = config.embedding_dim,
            "Sentence embedding model loaded successfully"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Creates a stub embedder with the default dimension.
    pub fn stub() -> Self {
        Self {
            backend: EmbedderBackend::Stub,
            config: SentenceEmbedderConfig::stub(),
        }
    }

    /// Embeds `text` into a unit vector; blank text yields the zero vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            debug!("Blank text, returning zero embedding");
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Generating sentence embedding"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = encoder
            .mean_pooled(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(l2_normalize(embedding))
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash % dim as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        l2_normalize(embedding)
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceEmbedderConfig {
        &self.config
    }
}

impl TextEmbedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        SentenceEmbedder::embed(self, text)
    }

    fn is_stub(&self) -> bool {
        SentenceEmbedder::is_stub(self)
    }
}

fn l2_normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
