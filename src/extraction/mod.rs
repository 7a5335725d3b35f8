//! Document-to-text boundary.
//!
//! A [`PageSource`] yields page images in order, a [`HandwritingRecognizer`]
//! turns each into text, and [`extract_pages`] assembles the [`AnswerSet`].
//! One unreadable page never aborts the document; it becomes empty text.

pub mod error;
pub mod recognizer;
pub mod source;

#[cfg(test)]
mod tests;

pub use error::ExtractionError;
#[cfg(any(test, feature = "mock"))]
pub use recognizer::MockRecognizer;
pub use recognizer::{HandwritingRecognizer, HttpRecognizer};
pub use source::{
    ImageDirectorySource, MemoryPageSource, PAGE_IMAGE_EXTENSIONS, PageImage, PageRead, PageSource,
    page_media_type,
};

use tracing::{info, warn};

use crate::comparator::AnswerSet;

/// Extracts one text per page of `source`, in page order.
///
/// Fails only if the source cannot be enumerated. A page that cannot be read
/// or recognized is logged and yields empty text.
pub async fn extract_pages(
    source: &dyn PageSource,
    recognizer: &dyn HandwritingRecognizer,
) -> Result<AnswerSet, ExtractionError> {
    let entries = source.pages().await?;

    let mut texts = Vec::with_capacity(entries.len());
    let mut failed = 0usize;
    for (offset, entry) in entries.into_iter().enumerate() {
        let outcome = match entry {
            Ok(image) => recognizer.recognize(&image).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!(page = offset + 1, error = %e, "Page extraction failed, using empty text");
                failed += 1;
                texts.push(String::new());
            }
        }
    }

    info!(pages = texts.len(), failed = failed, "Extracted document pages");
    Ok(AnswerSet::new(texts))
}
