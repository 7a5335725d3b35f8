//! Grader library crate (used by the server and integration tests).
//!
//! Grades free-text exam answers page by page: a student's page texts are
//! compared against the teacher's reference texts with two similarity
//! signals, a negation penalty and a configurable aggregate.
//!
//! # Public API Surface
//!
//! ## Engine
//! - [`GradingEngine`] - Reference lifecycle and page-aligned comparison
//! - [`AnswerSet`], [`Verdict`], [`PageIndex`], [`ComparatorState`]
//!
//! ## Scoring
//! - [`SimilarityScorer`] - Semantic + contextual scores for one page pair
//! - [`AggregationProfile`], [`Weights`] - Combining the two scores
//! - [`apply_penalty`] - Negation polarity penalty
//!
//! ## Text & Models
//! - [`Normalizer`], [`has_negation`] - Lexical preprocessing
//! - [`SentenceEmbedder`], [`CrossEncoder`] - Model-backed (or stub) signals
//!
//! ## Boundaries
//! - [`extract_pages`], [`HttpRecognizer`] - Document-to-text
//! - [`ReportStore`], [`FileReportStore`] - Report persistence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod comparator;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod extraction;
pub mod report;
pub mod scoring;
pub mod text;

pub use comparator::{
    AnswerSet, ComparatorState, ComparisonError, GradingEngine, PageIndex, ReferenceSet, Verdict,
};
pub use config::{Config, ConfigError};
pub use embedding::{
    CrossEncoder, CrossEncoderConfig, CrossEncoderError, EmbeddingError, PairScorer,
    SentenceEmbedder, SentenceEmbedderConfig, TextEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use extraction::MockRecognizer;
pub use extraction::{
    ExtractionError, HandwritingRecognizer, HttpRecognizer, ImageDirectorySource,
    MemoryPageSource, PAGE_IMAGE_EXTENSIONS, PageImage, PageRead, PageSource, extract_pages,
    page_media_type,
};
#[cfg(any(test, feature = "mock"))]
pub use report::MockReportStore;
pub use report::{FileReportStore, GradeReport, PersistenceError, ReportStore};
pub use scoring::{
    AggregationProfile, Grade, ScorePair, ScoringError, SimilarityScorer, Weights, apply_penalty,
    polarity_mismatch,
};
pub use text::{NormalizedText, Normalizer, has_negation, normalize};

/// The engine wired to the production model types.
pub type DefaultEngine = GradingEngine<SentenceEmbedder, CrossEncoder>;
