use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{info, instrument};

use grader::{
    AggregationProfile, AnswerSet, GradeReport, MemoryPageSource, PairScorer, TextEmbedder,
    Verdict, extract_pages, report::validate_exam_id,
};

use super::GRADER_STATUS_HEADER;
use super::error::GatewayError;
use super::payload::{
    DocumentInput, DocumentSource, ExamListResponse, MessageResponse, ReportListResponse,
    SaveReportResponse, StudentApiResponse, StudentUploadRequest, StudentUploadResponse,
    TeacherUploadRequest, TeacherUploadResponse, comparisons_from,
};
use super::state::HandlerState;
use super::upload::UploadBody;

pub(crate) fn json_with_status<T: Serialize>(status: &'static str, body: T) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(GRADER_STATUS_HEADER, HeaderValue::from_static(status));
    (StatusCode::OK, headers, Json(body)).into_response()
}

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid request body: {e}")))
}

/// Resolves a document to page texts, running recognition for uploaded images.
pub(crate) async fn load_document<E, C>(
    state: &HandlerState<E, C>,
    document: DocumentInput,
    images: MemoryPageSource,
) -> Result<AnswerSet, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    match document.into_source(images)? {
        DocumentSource::Pages(pages) => Ok(AnswerSet::new(pages)),
        DocumentSource::Images(images) => {
            let recognizer = state
                .recognizer
                .as_ref()
                .ok_or(GatewayError::RecognitionUnavailable)?;
            Ok(extract_pages(&images, recognizer.as_ref()).await?)
        }
    }
}

/// Runs the comparison on the blocking pool; model inference is CPU-bound.
async fn run_comparison<E, C>(
    state: &HandlerState<E, C>,
    candidate: AnswerSet,
    profile: AggregationProfile,
) -> Result<Vec<Verdict>, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let engine = Arc::clone(&state.engine);
    let verdicts = tokio::task::spawn_blocking(move || engine.compare(&candidate, &profile))
        .await
        .map_err(|e| GatewayError::InternalError(format!("comparison task failed: {e}")))??;
    Ok(verdicts)
}

#[instrument(skip(state, upload))]
pub async fn upload_teacher_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
    upload: UploadBody,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let request: TeacherUploadRequest = parse_body(serde_json::Value::Object(upload.fields))?;

    let exam_name = request
        .exam_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GatewayError::InvalidRequest("exam name is required".to_string()))?;
    validate_exam_id(&exam_name)?;

    let answers = load_document(&state, request.document, upload.images).await?;
    let pages = state.engine.load_reference(answers, exam_name.clone());

    Ok(json_with_status(
        super::STATUS_LOADED,
        TeacherUploadResponse {
            message: "Teacher answers uploaded successfully".to_string(),
            exam_name,
            pages,
        },
    ))
}

#[instrument(skip(state, upload))]
pub async fn upload_student_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
    upload: UploadBody,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let request: StudentUploadRequest = parse_body(serde_json::Value::Object(upload.fields))?;

    // Fail fast before paying for recognition.
    if state.engine.reference().is_none() {
        return Err(grader::ComparisonError::MissingReference.into());
    }

    let candidate = load_document(&state, request.document, upload.images).await?;
    let verdicts = run_comparison(&state, candidate, state.display_profile).await?;

    Ok(json_with_status(
        super::STATUS_GRADED,
        StudentUploadResponse {
            comparisons: comparisons_from(&verdicts),
        },
    ))
}

#[instrument(skip(state, upload))]
pub async fn upload_student_api_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
    upload: UploadBody,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let request: StudentUploadRequest = parse_body(serde_json::Value::Object(upload.fields))?;

    if state.engine.reference().is_none() {
        return Err(grader::ComparisonError::MissingReference.into());
    }

    let candidate = load_document(&state, request.document, upload.images).await?;
    let verdicts = run_comparison(&state, candidate, AggregationProfile::api()).await?;

    info!(
        student = request.student_name.as_deref().unwrap_or("-"),
        pages = verdicts.len(),
        "Graded submission"
    );

    Ok(json_with_status(
        super::STATUS_GRADED,
        StudentApiResponse {
            student_name: request.student_name,
            roll_number: request.roll_number,
            comparisons: comparisons_from(&verdicts),
        },
    ))
}

fn string_field(body: &serde_json::Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Stores an opaque report under `exam_name`, or the loaded reference's exam.
#[instrument(skip(state, body))]
pub async fn save_report_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    if !body.is_object() {
        return Err(GatewayError::InvalidRequest(
            "report must be a JSON object".to_string(),
        ));
    }

    let exam_name = string_field(&body, "exam_name")
        .or_else(|| state.engine.exam_id())
        .ok_or_else(|| {
            GatewayError::InvalidRequest(
                "no exam loaded; provide 'exam_name' with the report".to_string(),
            )
        })?;

    let verdicts = body
        .get("comparisons")
        .cloned()
        .unwrap_or_else(|| body.clone());

    let mut report = GradeReport::new(exam_name.clone(), verdicts).with_student(
        string_field(&body, "student_name"),
        string_field(&body, "roll_number"),
    );
    if let Some(profile) = string_field(&body, "profile") {
        report = report.with_profile(profile);
    }

    state.reports.save(&report).await?;

    Ok(json_with_status(
        super::STATUS_SAVED,
        SaveReportResponse {
            message: "Report saved successfully".to_string(),
            exam_name,
        },
    ))
}

#[instrument(skip(state))]
pub async fn list_exams_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let exams = state.reports.list_exams().await?;
    Ok(json_with_status(super::STATUS_OK, ExamListResponse { exams }))
}

#[instrument(skip(state))]
pub async fn list_reports_handler<E, C>(
    State(state): State<HandlerState<E, C>>,
    Path(exam_name): Path<String>,
) -> Result<Response, GatewayError>
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    let reports = state.reports.list_reports(&exam_name).await?;
    Ok(json_with_status(
        super::STATUS_OK,
        ReportListResponse { exam_name, reports },
    ))
}

#[instrument(skip(state))]
pub async fn reset_teacher_handler<E, C>(State(state): State<HandlerState<E, C>>) -> Response
where
    E: TextEmbedder + 'static,
    C: PairScorer + 'static,
{
    state.engine.reset();
    json_with_status(
        super::STATUS_RESET,
        MessageResponse {
            message: "Teacher data reset successfully".to_string(),
        },
    )
}
