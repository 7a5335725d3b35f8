use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::error::ExtractionError;
use super::source::PageImage;

#[async_trait]
/// Black-box handwriting-to-text service.
pub trait HandwritingRecognizer: Send + Sync {
    /// Returns the text written on `image`. May be empty.
    async fn recognize(&self, image: &PageImage) -> Result<String, ExtractionError>;
}

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    text: String,
}

/// Posts raw page bytes to an HTTP endpoint returning `{"text": "..."}`.
///
/// No timeout is applied unless one is set with [`HttpRecognizer::with_timeout`].
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    endpoint: reqwest::Url,
    http: HttpClient,
}

impl HttpRecognizer {
    pub fn new(endpoint: &str) -> Result<Self, ExtractionError> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| ExtractionError::InvalidEndpoint {
            reason: format!("{endpoint}: {e}"),
        })?;
        Ok(Self {
            endpoint,
            http: HttpClient::new(),
        })
    }

    /// Rebuilds the client with a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ExtractionError> {
        self.http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::InvalidEndpoint {
                reason: e.to_string(),
            })?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl HandwritingRecognizer for HttpRecognizer {
    async fn recognize(&self, image: &PageImage) -> Result<String, ExtractionError> {
        let page = image.index.get();
        let failed = |reason: String| ExtractionError::RecognitionFailed { page, reason };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, image.media_type)
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(failed(format!("service returned {}", resp.status())));
        }

        let body: RecognitionResponse = resp
            .json()
            .await
            .map_err(|e| failed(format!("malformed response: {e}")))?;

        Ok(body.text.trim().to_string())
    }
}

#[cfg(any(test, feature = "mock"))]
/// Recognizer that decodes the page bytes as UTF-8 text.
///
/// Pages whose name is registered with [`MockRecognizer::fail_on`] fail.
#[derive(Debug, Default, Clone)]
pub struct MockRecognizer {
    failing: std::collections::HashSet<String>,
    calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(any(test, feature = "mock"))]
impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Number of pages passed to [`HandwritingRecognizer::recognize`].
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl HandwritingRecognizer for MockRecognizer {
    async fn recognize(&self, image: &PageImage) -> Result<String, ExtractionError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if self.failing.contains(&image.name) {
            return Err(ExtractionError::RecognitionFailed {
                page: image.index.get(),
                reason: "mock failure".to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&image.bytes).trim().to_string())
    }
}
