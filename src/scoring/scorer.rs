use tracing::debug;

use crate::constants::MAX_SCORE;
use crate::embedding::{PairScorer, TextEmbedder};
use crate::text::{NormalizedText, Normalizer};

use super::error::ScoringError;
use super::types::ScorePair;

/// Computes the semantic and contextual signals for a student/teacher pair.
///
/// The signals are kept apart until aggregation: the embedding cosine is
/// cheap but blind to word order, the cross-encoder attends over both texts
/// jointly. Downstream policy may treat them differently.
pub struct SimilarityScorer<E, C> {
    normalizer: Normalizer,
    embedder: E,
    cross_encoder: C,
}

impl<E, C> std::fmt::Debug for SimilarityScorer<E, C>
where
    E: TextEmbedder,
    C: PairScorer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("embedder_stub", &self.embedder.is_stub())
            .field("cross_encoder_stub", &self.cross_encoder.is_stub())
            .finish()
    }
}

impl<E, C> SimilarityScorer<E, C>
where
    E: TextEmbedder,
    C: PairScorer,
{
    pub fn new(embedder: E, cross_encoder: C) -> Self {
        Self {
            normalizer: Normalizer::new(),
            embedder,
            cross_encoder,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn cross_encoder(&self) -> &C {
        &self.cross_encoder
    }

    /// Normalizes both raw texts and scores them.
    pub fn score(&self, student_text: &str, teacher_text: &str) -> Result<ScorePair, ScoringError> {
        let student = self.normalizer.normalize(student_text);
        let teacher = self.normalizer.normalize(teacher_text);
        self.score_normalized(&student, &teacher)
    }

    /// Scores already-normalized texts. Empty texts yield a near-zero pair.
    pub fn score_normalized(
        &self,
        student: &NormalizedText,
        teacher: &NormalizedText,
    ) -> Result<ScorePair, ScoringError> {
        let student_embedding = self.embedder.embed(student.as_str())?;
        let teacher_embedding = self.embedder.embed(teacher.as_str())?;

        let cosine = cosine_similarity(&student_embedding, &teacher_embedding)?;
        let semantic = f64::from(cosine.max(0.0)) * MAX_SCORE;

        let logit = self
            .cross_encoder
            .cross_score(student.as_str(), teacher.as_str())?;
        let contextual = sigmoid(f64::from(logit)) * MAX_SCORE;

        debug!(
            cosine = cosine,
            logit = logit,
            semantic = semantic,
            contextual = contextual,
            "Scored answer pair"
        );

        Ok(ScorePair::new(semantic, contextual))
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::ComputationFailed {
            reason: format!("embedding length mismatch: {} vs {}", a.len(), b.len()),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 1e-9 && norm_b > 1e-9 {
        Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
    } else {
        Ok(0.0)
    }
}
