use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use grader::{ComparisonError, ExtractionError, PersistenceError};

use super::GRADER_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("comparison failed: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("handwriting recognition is not configured; send page texts instead")]
    RecognitionUnavailable,

    #[error("report persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Comparison(ComparisonError::MissingReference) => {
                (StatusCode::CONFLICT, "missing_reference")
            }
            GatewayError::Comparison(ComparisonError::InvalidWeights { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_weights")
            }
            GatewayError::Comparison(ComparisonError::WorkerFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "comparison_error")
            }
            GatewayError::Extraction(
                ExtractionError::SourceUnavailable { .. } | ExtractionError::ReadFailed { .. },
            ) => (StatusCode::BAD_REQUEST, "extraction_error"),
            GatewayError::Extraction(ExtractionError::RecognitionFailed { .. }) => {
                (StatusCode::BAD_GATEWAY, "recognition_error")
            }
            GatewayError::Extraction(ExtractionError::InvalidEndpoint { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "recognition_error")
            }
            GatewayError::RecognitionUnavailable => {
                (StatusCode::BAD_REQUEST, "recognition_unavailable")
            }
            GatewayError::Persistence(PersistenceError::InvalidExamId { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_exam")
            }
            GatewayError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, grader_status) = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(GRADER_STATUS_HEADER, HeaderValue::from_static(grader_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
