//! Cross-encoder pair scoring (BERT / RoBERTa sequence classifier).
//!
//! [`CrossEncoder::score`] returns the raw logit; mapping it into a
//! percentage is the caller's job (see [`crate::scoring`]).

pub mod config;
pub mod error;


pub use config::{CrossEncoderConfig, MAX_SEQ_LEN};
pub use error::CrossEncoderError;

use std::collections::HashSet;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::PairScorer;
use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_tokenizer_with_truncation, missing_model_file};
use crate::text::is_stopword;

/// Logit the stub returns when either side has no content words.
pub const STUB_MIN_LOGIT: f32 = -4.0;

/// Slope of the stub's overlap-to-logit mapping.
const STUB_LOGIT_SCALE: f32 = 8.0;

pub struct CrossEncoder {
    device: candle_core::Device,
    config: CrossEncoderConfig,
    model: Option<BertClassifier>,
    tokenizer: Option<Tokenizer>,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: CrossEncoderConfig) -> Result<Self, CrossEncoderError> {
        if let Err(msg) = config.validate() {
            return Err(CrossEncoderError::InvalidConfig { reason: msg });
        }

        let Some(model_path) = config.model_path.clone() else {
            warn!("No cross-encoder model path configured, operating in stub mode");
            return Ok(Self {
                config,
                ..Self::stub()
            });
        };

        if !model_path.is_dir() {
            return Err(CrossEncoderError::ModelNotFound { path: model_path });
        }
        if let Some(missing) = missing_model_file(&model_path) {
            return Err(CrossEncoderError::ModelNotFound { path: missing });
        }

        let device = select_device("cross-encoder");
        debug!(?device, "Selected compute device for cross-encoder");

        info!(
            model_path = %model_path.display(),
            max_seq_len = config.max_seq_len,
            "Loading cross-encoder model"
        );

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            CrossEncoderError::ModelLoadFailed {
                reason: format!("Failed to load classifier: {}", e),
            }
        })?;

        let tokenizer =
            load_tokenizer_with_truncation(&model_path, config.max_seq_len).map_err(|e| {
                CrossEncoderError::ModelLoadFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                }
            })?;

        info!("Cross-encoder model loaded successfully");

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
        })
    }

    /// Lexical-overlap stand-in for the model; needs no files.
    pub fn stub() -> Self {
        Self {
            device: candle_core::Device::Cpu,
            config: CrossEncoderConfig::stub(),
            model: None,
            tokenizer: None,
        }
    }

    /// Scores the pair jointly and returns the single output logit.
    pub fn score(&self, first: &str, second: &str) -> Result<f32, CrossEncoderError> {
        debug!(
            first_len = first.len(),
            second_len = second.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring text pair"
        );

        if let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) {
            let tokens = tokenizer.encode((first, second), true).map_err(|e| {
                CrossEncoderError::TokenizationFailed {
                    reason: e.to_string(),
                }
            })?;

            let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
            let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
            let attention_mask =
                Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

            let logits = model
                .forward(&token_ids, &type_ids, &attention_mask)
                .map_err(|e| CrossEncoderError::InferenceFailed {
                    reason: e.to_string(),
                })?;

            let logit = logits
                .flatten_all()?
                .to_vec1::<f32>()?
                .first()
                .copied()
                .ok_or_else(|| CrossEncoderError::InferenceFailed {
                    reason: "classifier returned no logits".to_string(),
                })?;
            return Ok(logit);
        }

        let logit = placeholder_logit(first, second);
        debug!(logit = logit, "Computed logit (stub)");
        Ok(logit)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &CrossEncoderConfig {
        &self.config
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }
}

impl PairScorer for CrossEncoder {
    fn cross_score(&self, first: &str, second: &str) -> Result<f32, CrossEncoderError> {
        self.score(first, second)
    }

    fn is_stub(&self) -> bool {
        !self.is_model_loaded()
    }
}

/// Overlap of content words (0.6 recall of `first` + 0.4 Jaccard) as a logit.
fn placeholder_logit(first: &str, second: &str) -> f32 {
    let first_lower = first.to_lowercase();
    let first_words = content_words(&first_lower);

    let second_lower = second.to_lowercase();
    let second_words = content_words(&second_lower);

    if first_words.is_empty() || second_words.is_empty() {
        return STUB_MIN_LOGIT;
    }

    let matches = first_words.intersection(&second_words).count();
    let recall = matches as f32 / first_words.len() as f32;
    let union = first_words.union(&second_words).count();
    let jaccard = matches as f32 / union as f32;

    let overlap = 0.6 * recall + 0.4 * jaccard;
    STUB_LOGIT_SCALE * (overlap - 0.5)
}

fn content_words(lowered: &str) -> HashSet<&str> {
    lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty() && !is_stopword(w))
        .collect()
}
