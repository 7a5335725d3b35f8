use std::sync::Arc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::embedding::{PairScorer, TextEmbedder};
use crate::scoring::{AggregationProfile, SimilarityScorer, apply_penalty, polarity_mismatch};

use super::error::ComparisonError;
use super::state::ComparatorState;
use super::types::{AnswerSet, PageIndex, ReferenceSet, Verdict};

/// Grades candidate answer sets against a shared reference, page by page.
///
/// The reference is published as an `Arc` behind a lock that is only held
/// long enough to swap or clone the pointer. A comparison works on its own
/// snapshot, so a concurrent load or reset never tears an in-flight read.
///
/// Every load and reset starts a new generation. A comparison only marks its
/// own generation complete, so one that outlives a reload does not report the
/// new reference as compared.
pub struct GradingEngine<E, C> {
    scorer: SimilarityScorer<E, C>,
    reference: RwLock<Option<Arc<ReferenceSet>>>,
    generation: AtomicU64,
    completed_generation: AtomicU64,
    in_flight: AtomicUsize,
    workers: usize,
}

impl<E, C> std::fmt::Debug for GradingEngine<E, C>
where
    E: TextEmbedder,
    C: PairScorer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradingEngine")
            .field("scorer", &self.scorer)
            .field("state", &self.state())
            .field("workers", &self.workers)
            .finish()
    }
}

impl<E, C> GradingEngine<E, C>
where
    E: TextEmbedder,
    C: PairScorer,
{
    /// Creates an engine in [`ComparatorState::NoReference`] scoring pages sequentially.
    pub fn new(scorer: SimilarityScorer<E, C>) -> Self {
        Self {
            scorer,
            reference: RwLock::new(None),
            generation: AtomicU64::new(1),
            completed_generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            workers: 1,
        }
    }

    /// Sets how many threads score pages of one comparison (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn scorer(&self) -> &SimilarityScorer<E, C> {
        &self.scorer
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ComparatorState {
        let slot = self.reference.read();
        if slot.is_none() {
            ComparatorState::NoReference
        } else if self.in_flight.load(Ordering::Acquire) > 0 {
            ComparatorState::ComparisonInProgress
        } else if self.completed_generation.load(Ordering::Acquire)
            == self.generation.load(Ordering::Acquire)
        {
            ComparatorState::ComparisonComplete
        } else {
            ComparatorState::ReferenceLoaded
        }
    }

    /// Snapshot of the current reference.
    pub fn reference(&self) -> Option<Arc<ReferenceSet>> {
        self.reference.read().clone()
    }

    /// Reference snapshot together with the generation it belongs to.
    fn snapshot(&self) -> Option<(Arc<ReferenceSet>, u64)> {
        let slot = self.reference.read();
        let generation = self.generation.load(Ordering::Acquire);
        slot.clone().map(|reference| (reference, generation))
    }

    /// Exam identifier of the loaded reference.
    pub fn exam_id(&self) -> Option<String> {
        self.reference
            .read()
            .as_ref()
            .map(|reference| reference.exam_id().to_string())
    }

    /// Replaces the reference wholesale. Returns the number of pages loaded.
    pub fn load_reference(&self, answers: AnswerSet, exam_id: impl Into<String>) -> usize {
        let reference = Arc::new(ReferenceSet::new(exam_id, answers));
        let pages = reference.len();

        info!(
            exam_id = reference.exam_id(),
            pages = pages,
            "Loaded reference answers"
        );

        let mut slot = self.reference.write();
        *slot = Some(reference);
        self.generation.fetch_add(1, Ordering::AcqRel);
        pages
    }

    /// Clears the reference. Idempotent.
    pub fn reset(&self) {
        let mut slot = self.reference.write();
        if let Some(previous) = slot.take() {
            info!(exam_id = previous.exam_id(), "Reset reference answers");
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Grades `candidate` against the reference under `profile`.
    ///
    /// Only pages `1..=min(reference, candidate)` are compared; extra pages on
    /// either side are dropped without a verdict. A page that fails to score,
    /// or whose scorer panics, yields a zero-score verdict carrying the
    /// failure, the rest proceed.
    pub fn compare(
        &self,
        candidate: &AnswerSet,
        profile: &AggregationProfile,
    ) -> Result<Vec<Verdict>, ComparisonError> {
        if let AggregationProfile::WeightedMean(weights) = profile {
            weights.validate()?;
        }

        let (reference, generation) = self.snapshot().ok_or(ComparisonError::MissingReference)?;

        let aligned = reference.len().min(candidate.len());
        if reference.len() != candidate.len() {
            debug!(
                reference_pages = reference.len(),
                candidate_pages = candidate.len(),
                aligned = aligned,
                "Page counts differ, truncating to the shorter document"
            );
        }

        let pairs: Vec<(PageIndex, &str, &str)> = reference
            .answers()
            .iter()
            .zip(candidate.iter())
            .map(|((index, teacher), (_, student))| (index, student, teacher))
            .collect();

        let guard = InFlight::enter(self);
        let verdicts = self.grade_pages(&pairs, profile)?;
        guard.complete(generation);

        info!(
            exam_id = reference.exam_id(),
            profile = profile.name(),
            pages = verdicts.len(),
            degenerate = verdicts.iter().filter(|v| v.is_degenerate()).count(),
            "Comparison complete"
        );

        Ok(verdicts)
    }

    fn grade_pages(
        &self,
        pairs: &[(PageIndex, &str, &str)],
        profile: &AggregationProfile,
    ) -> Result<Vec<Verdict>, ComparisonError> {
        if self.workers <= 1 || pairs.len() <= 1 {
            return Ok(pairs
                .iter()
                .map(|&(index, student, teacher)| self.grade_page(index, student, teacher, profile))
                .collect());
        }

        let chunk_size = pairs.len().div_ceil(self.workers);

        thread::scope(|scope| {
            let handles: Vec<_> = pairs
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|&(index, student, teacher)| {
                                self.grade_page(index, student, teacher, profile)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            // Joining in spawn order keeps verdicts in page order.
            let mut verdicts = Vec::with_capacity(pairs.len());
            for handle in handles {
                let chunk = handle.join().map_err(|_| ComparisonError::WorkerFailed {
                    reason: "scoring thread panicked".to_string(),
                })?;
                verdicts.extend(chunk);
            }
            Ok(verdicts)
        })
    }

    fn grade_page(
        &self,
        index: PageIndex,
        student: &str,
        teacher: &str,
        profile: &AggregationProfile,
    ) -> Verdict {
        let mismatch = polarity_mismatch(student, teacher);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.scorer.score(student, teacher).map(|raw| {
                let scores = apply_penalty(raw, student, teacher);
                (scores, profile.aggregate(scores))
            })
        }));

        let reason = match outcome {
            Ok(Ok((scores, grade))) => {
                return Verdict::scored(index, student, teacher, scores, grade, mismatch);
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("scorer panicked: {}", panic_message(payload.as_ref())),
        };

        warn!(page = index.get(), error = %reason, "Failed to score page");
        Verdict::degenerate(index, student, teacher, mismatch, reason)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Counts a comparison as in flight until dropped.
struct InFlight<'a> {
    in_flight: &'a AtomicUsize,
    completed_generation: &'a AtomicU64,
}

impl<'a> InFlight<'a> {
    fn enter<E, C>(engine: &'a GradingEngine<E, C>) -> Self {
        engine.in_flight.fetch_add(1, Ordering::AcqRel);
        Self {
            in_flight: &engine.in_flight,
            completed_generation: &engine.completed_generation,
        }
    }

    fn complete(self, generation: u64) {
        self.completed_generation.fetch_max(generation, Ordering::AcqRel);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
