//! Request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use grader::{MemoryPageSource, ReferenceSet, Verdict};

use super::error::GatewayError;

/// Inline page texts of a JSON upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub pages: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum DocumentSource {
    Pages(Vec<String>),
    Images(MemoryPageSource),
}

impl DocumentInput {
    /// Exactly one of inline `pages` or uploaded page images must be given.
    pub fn into_source(self, images: MemoryPageSource) -> Result<DocumentSource, GatewayError> {
        match (self.pages, images.is_empty()) {
            (Some(pages), true) => Ok(DocumentSource::Pages(pages)),
            (None, false) => Ok(DocumentSource::Images(images)),
            (Some(_), false) => Err(GatewayError::InvalidRequest(
                "provide either 'pages' or page images, not both".to_string(),
            )),
            (None, true) => Err(GatewayError::InvalidRequest(
                "no document provided: expected 'pages' or uploaded page images".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeacherUploadRequest {
    #[serde(default)]
    pub exam_name: Option<String>,
    #[serde(flatten)]
    pub document: DocumentInput,
}

#[derive(Debug, Serialize)]
pub struct TeacherUploadResponse {
    pub message: String,
    pub exam_name: String,
    pub pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct StudentUploadRequest {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(flatten)]
    pub document: DocumentInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One page of a comparison as returned to clients.
pub struct PageComparison {
    pub student_text: String,
    pub teacher_text: String,
    pub similarity_score: f64,
    pub contextual_score: f64,
    /// Rounded total.
    pub total_score: f64,
}

impl From<&Verdict> for PageComparison {
    fn from(verdict: &Verdict) -> Self {
        Self {
            student_text: verdict.student_text.clone(),
            teacher_text: verdict.teacher_text.clone(),
            similarity_score: verdict.semantic_score,
            contextual_score: verdict.contextual_score,
            total_score: verdict.total_score,
        }
    }
}

/// Page number → comparison. Serialized as a JSON object keyed by page number.
pub type Comparisons = BTreeMap<usize, PageComparison>;

pub fn comparisons_from(verdicts: &[Verdict]) -> Comparisons {
    verdicts
        .iter()
        .map(|v| (v.page_index.get(), PageComparison::from(v)))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StudentUploadResponse {
    pub comparisons: Comparisons,
}

#[derive(Debug, Serialize)]
pub struct StudentApiResponse {
    pub student_name: Option<String>,
    pub roll_number: Option<String>,
    pub comparisons: Comparisons,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SaveReportResponse {
    pub message: String,
    pub exam_name: String,
}

#[derive(Debug, Serialize)]
pub struct ExamListResponse {
    pub exams: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub exam_name: String,
    pub reports: Vec<grader::GradeReport>,
}

#[derive(Debug, Serialize)]
pub struct ReferenceSummary {
    pub exam_name: String,
    pub pages: usize,
    pub loaded_at: String,
}

impl From<&ReferenceSet> for ReferenceSummary {
    fn from(reference: &ReferenceSet) -> Self {
        Self {
            exam_name: reference.exam_id().to_string(),
            pages: reference.len(),
            loaded_at: reference.loaded_at().to_rfc3339(),
        }
    }
}
