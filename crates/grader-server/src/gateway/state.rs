use std::sync::Arc;

use grader::{
    AggregationProfile, GradingEngine, HandwritingRecognizer, PairScorer, ReportStore,
    TextEmbedder,
};

pub struct HandlerState<E, C> {
    pub engine: Arc<GradingEngine<E, C>>,

    pub reports: Arc<dyn ReportStore>,

    /// `None` when no recognition endpoint is configured.
    pub recognizer: Option<Arc<dyn HandwritingRecognizer>>,

    /// Profile used by `/upload/student`.
    pub display_profile: AggregationProfile,
}

// Manual impl: derive would require `E: Clone, C: Clone`.
impl<E, C> Clone for HandlerState<E, C> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            reports: Arc::clone(&self.reports),
            recognizer: self.recognizer.clone(),
            display_profile: self.display_profile,
        }
    }
}

impl<E, C> HandlerState<E, C>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    pub fn new(engine: Arc<GradingEngine<E, C>>, reports: Arc<dyn ReportStore>) -> Self {
        Self {
            engine,
            reports,
            recognizer: None,
            display_profile: AggregationProfile::display(),
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn HandwritingRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_display_profile(mut self, profile: AggregationProfile) -> Self {
        self.display_profile = profile;
        self
    }
}
