use std::io;
use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};

// Every exported model directory (embedder or cross-encoder) holds these three files.
pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the first required model file missing from `model_dir`, if any.
pub fn missing_model_file(model_dir: &Path) -> Option<PathBuf> {
    [MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE, TOKENIZER_FILE]
        .into_iter()
        .map(|name| model_dir.join(name))
        .find(|path| !path.exists())
}

/// Loads `tokenizer.json` from `model_dir` with truncation at `max_len` tokens.
///
/// Inputs longer than the model limit are cut rather than rejected; for pair
/// inputs the longest sequence is trimmed first.
pub fn load_tokenizer_with_truncation(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(model_dir.join(TOKENIZER_FILE)).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}
