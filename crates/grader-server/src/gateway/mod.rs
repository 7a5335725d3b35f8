//! HTTP gateway (Axum) over the grading engine.
//!
//! This module is primarily used by the `grader` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;
pub mod upload;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use grader::{PairScorer, TextEmbedder};

pub use error::GatewayError;
pub use handler::{
    list_exams_handler, list_reports_handler, reset_teacher_handler, save_report_handler,
    upload_student_api_handler, upload_student_handler, upload_teacher_handler,
};
pub use state::HandlerState;

use payload::ReferenceSummary;

/// Response header carrying a short machine-readable outcome.
pub const GRADER_STATUS_HEADER: &str = "x-grader-status";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_OK: &str = "ok";
pub const STATUS_LOADED: &str = "loaded";
pub const STATUS_GRADED: &str = "graded";
pub const STATUS_SAVED: &str = "saved";
pub const STATUS_RESET: &str = "reset";

/// Largest accepted request body; multipart uploads carry whole page scans.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub fn create_router_with_state<E, C>(state: HandlerState<E, C>) -> Router
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, C>))
        .route("/upload/teacher", post(upload_teacher_handler::<E, C>))
        .route("/upload/student", post(upload_student_handler::<E, C>))
        .route("/upload/student_api", post(upload_student_api_handler::<E, C>))
        .route("/save-report", post(save_report_handler::<E, C>))
        .route("/reports/exams", get(list_exams_handler::<E, C>))
        .route("/reports/{exam}", get(list_reports_handler::<E, C>))
        .route(
            "/reset/teacher",
            get(reset_teacher_handler::<E, C>).post(reset_teacher_handler::<E, C>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedder_mode: &'static str,
    pub cross_encoder_mode: &'static str,
    pub comparator: &'static str,
    pub reference: Option<ReferenceSummary>,
    pub recognition: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        GRADER_STATUS_HEADER,
        HeaderValue::from_static(STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

fn mode(is_stub: bool) -> &'static str {
    if is_stub { "stub" } else { "real" }
}

/// Reports model modes and whether a reference is loaded. Stub models still
/// answer requests, so readiness does not depend on them.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, C>(State(state): State<HandlerState<E, C>>) -> Response
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let scorer = state.engine.scorer();

    let components = ComponentStatus {
        http: STATUS_READY,
        embedder_mode: mode(scorer.embedder().is_stub()),
        cross_encoder_mode: mode(scorer.cross_encoder().is_stub()),
        comparator: state.engine.state().as_str(),
        reference: state
            .engine
            .reference()
            .map(|reference| ReferenceSummary::from(reference.as_ref())),
        recognition: if state.recognizer.is_some() {
            "configured"
        } else {
            "disabled"
        },
    };

    let mut headers = HeaderMap::new();
    headers.insert(GRADER_STATUS_HEADER, HeaderValue::from_static(STATUS_READY));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: STATUS_OK,
            components,
        }),
    )
        .into_response()
}
