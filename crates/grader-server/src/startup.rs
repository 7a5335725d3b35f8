//! Builds the handler state from a validated [`Config`].

use std::sync::Arc;

use grader::config::Config;
use grader::{
    CrossEncoder, FileReportStore, GradingEngine, HttpRecognizer, SentenceEmbedder,
    SimilarityScorer,
};

use crate::gateway::HandlerState;

pub type ServerState = HandlerState<SentenceEmbedder, CrossEncoder>;

/// Loads both models, the report store and the optional recognizer.
///
/// Stub-mode fallbacks are logged by the model loaders themselves.
pub fn build_state(config: &Config) -> anyhow::Result<ServerState> {
    let embedder = SentenceEmbedder::load(config.embedder_config())?;
    let cross_encoder = CrossEncoder::load(config.cross_encoder_config())?;

    let engine = Arc::new(
        GradingEngine::new(SimilarityScorer::new(embedder, cross_encoder))
            .with_workers(config.workers),
    );
    let reports = Arc::new(FileReportStore::new(config.storage_path.clone()));

    let mut state =
        HandlerState::new(engine, reports).with_display_profile(config.display_profile());

    match &config.ocr_url {
        Some(url) => {
            let recognizer = HttpRecognizer::new(url)?;
            tracing::info!(endpoint = recognizer.endpoint(), "Handwriting recognition enabled");
            state = state.with_recognizer(Arc::new(recognizer));
        }
        None => {
            tracing::warn!("No GRADER_OCR_URL configured, image uploads are disabled");
        }
    }

    Ok(state)
}
