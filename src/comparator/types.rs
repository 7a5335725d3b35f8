use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{Grade, ScorePair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// 1-based position of a page within a document.
pub struct PageIndex(usize);

impl PageIndex {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Returns `None` for `0`.
    pub fn new(index: usize) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Converts a 0-based offset.
    pub fn from_offset(offset: usize) -> Self {
        Self(offset + 1)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// 0-based offset into the page sequence.
    pub fn offset(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered raw page texts of one document.
///
/// Every page has a string; an unreadable page is an empty string, never a
/// gap, so indices stay contiguous.
pub struct AnswerSet {
    pages: Vec<String>,
}

impl AnswerSet {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Text of page `index`, if the document has that many pages.
    pub fn page(&self, index: PageIndex) -> Option<&str> {
        self.pages.get(index.offset()).map(String::as_str)
    }

    /// Iterates pages in order with their 1-based index.
    pub fn iter(&self) -> impl Iterator<Item = (PageIndex, &str)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(offset, text)| (PageIndex::from_offset(offset), text.as_str()))
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<String> {
        self.pages
    }
}

impl From<Vec<String>> for AnswerSet {
    fn from(pages: Vec<String>) -> Self {
        Self::new(pages)
    }
}

impl<S: Into<String>> FromIterator<S> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The loaded teacher answers plus the exam they belong to.
///
/// Immutable once published; replacing the reference swaps the whole value.
pub struct ReferenceSet {
    exam_id: String,
    answers: AnswerSet,
    loaded_at: DateTime<Utc>,
}

impl ReferenceSet {
    pub fn new(exam_id: impl Into<String>, answers: AnswerSet) -> Self {
        Self {
            exam_id: exam_id.into(),
            answers,
            loaded_at: Utc::now(),
        }
    }

    /// Opaque exam identifier, carried for the persistence layer.
    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Result of grading one aligned page.
pub struct Verdict {
    pub page_index: PageIndex,
    pub student_text: String,
    pub teacher_text: String,
    /// Semantic score after any negation penalty, in `[0, 100]`.
    pub semantic_score: f64,
    /// Contextual score after any negation penalty, in `[0, 100]`.
    pub contextual_score: f64,
    /// Rounded total under the requested profile.
    pub total_score: f64,
    /// Unrounded total.
    pub total_score_exact: f64,
    /// Whether exactly one side was negated (and the scores were halved).
    pub negation_mismatch: bool,
    /// Why scoring this page failed. Scores are zero when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl Verdict {
    pub(crate) fn scored(
        page_index: PageIndex,
        student_text: &str,
        teacher_text: &str,
        scores: ScorePair,
        grade: Grade,
        negation_mismatch: bool,
    ) -> Self {
        Self {
            page_index,
            student_text: student_text.to_string(),
            teacher_text: teacher_text.to_string(),
            semantic_score: scores.semantic,
            contextual_score: scores.contextual,
            total_score: grade.rounded,
            total_score_exact: grade.exact,
            negation_mismatch,
            failure: None,
        }
    }

    pub(crate) fn degenerate(
        page_index: PageIndex,
        student_text: &str,
        teacher_text: &str,
        negation_mismatch: bool,
        reason: String,
    ) -> Self {
        Self {
            page_index,
            student_text: student_text.to_string(),
            teacher_text: teacher_text.to_string(),
            semantic_score: 0.0,
            contextual_score: 0.0,
            total_score: 0.0,
            total_score_exact: 0.0,
            negation_mismatch,
            failure: Some(reason),
        }
    }

    /// The two (penalized) signals as a pair.
    pub fn scores(&self) -> ScorePair {
        ScorePair::new(self.semantic_score, self.contextual_score)
    }

    /// `true` if the page could not be scored.
    pub fn is_degenerate(&self) -> bool {
        self.failure.is_some()
    }
}
