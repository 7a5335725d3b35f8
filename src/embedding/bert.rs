use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{self, BertModel};
use candle_transformers::models::xlm_roberta::{self, XLMRobertaModel};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use super::utils::{MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE};

/// RoBERTa's `<pad>` id; position ids start right after it.
const ROBERTA_PAD_TOKEN_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Architecture {
    Bert,
    Roberta,
}

impl Architecture {
    /// Reads `model_type` from `config.json`; anything not RoBERTa-family is BERT.
    pub(crate) fn from_config(config: &Value) -> Self {
        match config.get("model_type").and_then(Value::as_str) {
            Some("roberta" | "xlm-roberta" | "camembert") => Self::Roberta,
            _ => Self::Bert,
        }
    }
}

/// Parses a RoBERTa `config.json`, filling keys older exports omit.
pub(crate) fn roberta_config(mut raw: Value) -> Result<xlm_roberta::Config> {
    if let Some(object) = raw.as_object_mut() {
        object
            .entry("position_embedding_type")
            .or_insert_with(|| Value::from("absolute"));
        object
            .entry("pad_token_id")
            .or_insert_with(|| Value::from(ROBERTA_PAD_TOKEN_ID));
    }
    serde_json::from_value(raw)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse RoBERTa config: {}", e)))
}

/// Encoder trunk. RoBERTa needs its own embeddings: position ids are offset
/// past the padding id, which `BertModel` does not do.
enum Trunk {
    Bert(BertModel),
    Roberta(XLMRobertaModel),
}

impl Trunk {
    /// Accepts `bert.`, `roberta.` or unprefixed checkpoints.
    fn load(model_dir: &Path, device: &Device) -> Result<(Self, VarBuilder<'static>, usize)> {
        let config_content = std::fs::read_to_string(model_dir.join(MODEL_CONFIG_FILE))?;
        let raw: Value = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights_path = model_dir.join(MODEL_WEIGHTS_FILE);
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let roberta_prefixed = vb.contains_tensor("roberta.embeddings.word_embeddings.weight");
        if roberta_prefixed || Architecture::from_config(&raw) == Architecture::Roberta {
            let config = roberta_config(raw)?;
            let trunk_vb = if roberta_prefixed { vb.pp("roberta") } else { vb.clone() };
            let model = XLMRobertaModel::new(&config, trunk_vb)?;
            return Ok((Self::Roberta(model), vb, config.hidden_size));
        }

        let config: bert::Config = serde_json::from_value(raw)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb.clone(), &config)?
        };
        Ok((Self::Bert(model), vb, config.hidden_size))
    }

    /// Token states of shape `[batch, seq, hidden]`.
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        match self {
            Self::Bert(model) => model.forward(input_ids, token_type_ids, Some(attention_mask)),
            Self::Roberta(model) => {
                model.forward(input_ids, attention_mask, token_type_ids, None, None, None)
            }
        }
    }
}

/// Single-logit classification head.
///
/// BERT exports ship a single `classifier` linear layer; RoBERTa exports ship
/// `classifier.dense` + tanh + `classifier.out_proj`.
enum ClassifierHead {
    Linear(Linear),
    Roberta { dense: Linear, out_proj: Linear },
}

impl ClassifierHead {
    fn load(vb: VarBuilder, hidden_size: usize) -> Result<Self> {
        if vb.contains_tensor("classifier.out_proj.weight") {
            let dense = candle_nn::linear(hidden_size, hidden_size, vb.pp("classifier.dense"))?;
            let out_proj = candle_nn::linear(hidden_size, 1, vb.pp("classifier.out_proj"))?;
            Ok(Self::Roberta { dense, out_proj })
        } else {
            Ok(Self::Linear(candle_nn::linear(
                hidden_size,
                1,
                vb.pp("classifier"),
            )?))
        }
    }

    fn forward(&self, cls_token: &Tensor) -> Result<Tensor> {
        match self {
            Self::Linear(classifier) => classifier.forward(cls_token),
            Self::Roberta { dense, out_proj } => out_proj.forward(&dense.forward(cls_token)?.tanh()?),
        }
    }
}

struct CrossEncoderImpl {
    trunk: Trunk,
    head: ClassifierHead,
}

/// Cross-encoder: joint encoding of a text pair followed by a one-logit head.
#[derive(Clone)]
pub struct BertClassifier(Arc<CrossEncoderImpl>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (trunk, vb, hidden_size) = Trunk::load(model_dir.as_ref(), device)?;
        let head = ClassifierHead::load(vb, hidden_size)?;
        Ok(Self(Arc::new(CrossEncoderImpl { trunk, head })))
    }

    /// Returns logits of shape `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let output = self
            .0
            .trunk
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.0.head.forward(&cls_token)
    }
}

/// Bi-encoder: token states mean-pooled into one sentence vector.
#[derive(Clone)]
pub struct BertEncoder {
    trunk: Arc<Trunk>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (trunk, _, hidden_size) = Trunk::load(model_dir.as_ref(), device)?;
        Ok(Self {
            trunk: Arc::new(trunk),
            hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns attention-masked mean pooled states of shape `[batch, hidden]`.
    pub fn mean_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .trunk
            .forward(input_ids, token_type_ids, attention_mask)?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        // Special tokens are always attended, so the count is never zero.
        let counts = mask.sum(1)?;
        summed.broadcast_div(&counts)
    }
}
