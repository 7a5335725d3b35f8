use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::PersistenceError;

/// Longest accepted exam identifier, in bytes.
pub const MAX_EXAM_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A graded submission as handed to the store.
///
/// `verdicts` is opaque: whatever the caller considers the comparison
/// result. The store does not interpret it.
pub struct GradeReport {
    pub exam_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    /// Aggregation profile name, when known.
    #[serde(default)]
    pub profile: Option<String>,
    pub verdicts: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl GradeReport {
    /// Creates a report stamped with the current time.
    pub fn new(exam_id: impl Into<String>, verdicts: serde_json::Value) -> Self {
        Self {
            exam_id: exam_id.into(),
            student_name: None,
            roll_number: None,
            profile: None,
            verdicts,
            created_at: Utc::now(),
        }
    }

    pub fn with_student(mut self, name: Option<String>, roll_number: Option<String>) -> Self {
        self.student_name = name;
        self.roll_number = roll_number;
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Checks that `exam_id` is usable as a single path segment.
pub fn validate_exam_id(exam_id: &str) -> Result<(), PersistenceError> {
    let invalid = |reason: &str| {
        Err(PersistenceError::InvalidExamId {
            exam_id: exam_id.to_string(),
            reason: reason.to_string(),
        })
    };

    if exam_id.trim().is_empty() {
        return invalid("must not be empty");
    }
    if exam_id.len() > MAX_EXAM_ID_LEN {
        return invalid("too long");
    }
    if exam_id.starts_with('.') {
        return invalid("must not start with '.'");
    }
    if exam_id
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return invalid("must not contain path separators or control characters");
    }
    Ok(())
}
