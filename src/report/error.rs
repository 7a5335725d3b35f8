use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Exam identifiers double as directory names.
    #[error("invalid exam identifier '{exam_id}': {reason}")]
    InvalidExamId { exam_id: String, reason: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("failed to encode report: {reason}")]
    Serialization { reason: String },

    #[error("corrupt report at {path}:{line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("report store unavailable: {reason}")]
    Unavailable { reason: String },
}
