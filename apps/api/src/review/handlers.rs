//! Axum route handlers for the review endpoints.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_document;
use crate::review::augment::{augment_bullet, AugmentRequest, AugmentResult};
use crate::review::comparison::{compare_resume, ComparisonReport};
use crate::review::grader::{grade_resume, GradeReport};
use crate::review::parse::LlmOutcome;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const JOB_TEXT_FIELD: &str = "job_application_text";

// ────────────────────────────────────────────────────────────────────────────
// Multipart form handling
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    job_application_text: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Reads the `file` and `job_application_text` fields; other fields are ignored.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::Validation(format!("The '{FILE_FIELD}' field must include a filename"))
                })?;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile { filename, bytes });
            }
            Some(JOB_TEXT_FIELD) => {
                form.job_application_text = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn require_file(form: &mut UploadForm) -> Result<UploadedFile, AppError> {
    form.file
        .take()
        .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' upload")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /augment
///
/// Rewrites one resume bullet point into three stronger alternatives.
pub async fn handle_augment(
    State(state): State<AppState>,
    payload: Result<Json<AugmentRequest>, JsonRejection>,
) -> Result<Json<LlmOutcome<AugmentResult>>, AppError> {
    let Json(request) = payload?;
    if request.bullet_point.trim().is_empty() {
        return Err(AppError::Validation(
            "bullet_point cannot be empty".to_string(),
        ));
    }

    let outcome = augment_bullet(&request.bullet_point, state.llm.as_ref()).await?;
    info!(structured = outcome.is_structured(), "Review complete");
    Ok(Json(outcome))
}

/// POST /grader
///
/// Grades an uploaded resume (PDF, DOCX, or TXT).
pub async fn handle_grader(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<LlmOutcome<GradeReport>>, AppError> {
    let mut form = read_upload_form(multipart?).await?;
    let upload = require_file(&mut form)?;
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "Grading resume");

    let resume_text = extract_document(&upload.filename, upload.bytes).await?;

    let outcome = grade_resume(&resume_text, state.llm.as_ref()).await?;
    info!(structured = outcome.is_structured(), "Review complete");
    Ok(Json(outcome))
}

/// POST /comparison
///
/// Compares an uploaded resume with the submitted job application text.
pub async fn handle_comparison(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<LlmOutcome<ComparisonReport>>, AppError> {
    let mut form = read_upload_form(multipart?).await?;
    let upload = require_file(&mut form)?;
    let job_application_text = form
        .job_application_text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(format!("{JOB_TEXT_FIELD} is required and cannot be empty"))
        })?;
    info!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        job_text_chars = job_application_text.chars().count(),
        "Comparing resume to job application"
    );

    let resume_text = extract_document(&upload.filename, upload.bytes).await?;

    let outcome = compare_resume(&resume_text, &job_application_text, state.llm.as_ref()).await?;
    info!(structured = outcome.is_structured(), "Review complete");
    Ok(Json(outcome))
}
