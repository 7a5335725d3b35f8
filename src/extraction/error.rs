//! Extraction error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a document into page texts.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The document (page directory) could not be enumerated.
    #[error("document source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A single page image could not be read.
    #[error("failed to read page image {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The recognition service rejected or failed on a page.
    #[error("handwriting recognition failed for page {page}: {reason}")]
    RecognitionFailed { page: usize, reason: String },

    /// The recognition endpoint is not usable.
    #[error("invalid recognition endpoint: {reason}")]
    InvalidEndpoint { reason: String },
}
