//! Embedding + model utilities.
//!
//! - [`sentence`] embeds a single text into a dense vector (semantic signal).
//! - [`cross_encoder`] scores a text pair jointly (contextual signal).
//!
//! Both sit behind narrow traits so the scorer can run against deterministic
//! fakes in tests.

/// BERT encoder / classifier wrappers.
pub mod bert;
/// Cross-encoder pair scorer.
pub mod cross_encoder;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use cross_encoder::{CrossEncoder, CrossEncoderConfig, CrossEncoderError};
pub use error::EmbeddingError;
pub use sentence::{
    SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceEmbedder, SentenceEmbedderConfig,
};

/// `embed(text) -> vector`.
///
/// Implementations must return a vector for empty input rather than an error.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// `true` when backed by a model-less stand-in.
    fn is_stub(&self) -> bool {
        false
    }
}

/// `cross_score(a, b) -> logit`.
pub trait PairScorer: Send + Sync {
    fn cross_score(&self, first: &str, second: &str) -> Result<f32, CrossEncoderError>;

    /// `true` when backed by a model-less stand-in.
    fn is_stub(&self) -> bool {
        false
    }
}
