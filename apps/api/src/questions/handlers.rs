//! Axum route handlers for the Question Set API.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::text::{extract_text, ResumeDocument};
use crate::models::question_set::{QuestionSet, SOURCE_RESUME, SOURCE_VOICE};
use crate::questions::service::{create_question_set, QuestionSetSummary};
use crate::routes::history_limit;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TranscriptionRequest {
    pub transcription: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionSetHistoryQuery {
    pub user_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// The parts of a resume upload form we care about.
struct ResumeUpload {
    filename: String,
    bytes: Bytes,
    user_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/question-sets/resume
///
/// Multipart form: `file` (PDF or DOCX) and an optional `user_id` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuestionSetSummary>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    info!(
        "Received resume upload '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let document = ResumeDocument::from_upload(&upload.filename, upload.bytes);
    let text = tokio::task::spawn_blocking(move || extract_text(&document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;

    let summary = create_question_set(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.entities.as_ref(),
        &text,
        upload.user_id,
        SOURCE_RESUME,
    )
    .await?;
    Ok(Json(summary))
}

/// POST /api/v1/question-sets/transcription
pub async fn handle_transcription(
    State(state): State<AppState>,
    Json(req): Json<TranscriptionRequest>,
) -> Result<Json<QuestionSetSummary>, AppError> {
    if req.transcription.trim().is_empty() {
        return Err(AppError::Validation(
            "No transcription provided".to_string(),
        ));
    }

    let summary = create_question_set(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.entities.as_ref(),
        &req.transcription,
        req.user_id,
        SOURCE_VOICE,
    )
    .await?;
    Ok(Json(summary))
}

/// GET /api/v1/question-sets
pub async fn handle_list_question_sets(
    State(state): State<AppState>,
    Query(params): Query<QuestionSetHistoryQuery>,
) -> Result<Json<Vec<QuestionSet>>, AppError> {
    let sets = state
        .store
        .recent_question_sets(params.user_id, history_limit(params.limit))
        .await?;
    Ok(Json(sets))
}

/// GET /api/v1/question-sets/:id
pub async fn handle_get_question_set(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionSet>, AppError> {
    let set = state
        .store
        .find_question_set(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question set {id} not found")))?;
    Ok(Json(set))
}

async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut user_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                file = Some((filename, bytes));
            }
            Some("user_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read user_id: {e}")))?;
                if !raw.trim().is_empty() {
                    let id = Uuid::parse_str(raw.trim())
                        .map_err(|_| AppError::Validation("user_id is not a valid UUID".to_string()))?;
                    user_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    if filename.trim().is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    Ok(ResumeUpload {
        filename,
        bytes,
        user_id,
    })
}
