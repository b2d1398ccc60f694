//! Axum route handlers for answers and feedback.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::compare_and_provide_feedback;
use crate::evaluation::service::{submit_answer, SubmitAnswerRequest, SubmitAnswerResponse};
use crate::models::answer::AnswerRecord;
use crate::routes::history_limit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerHistoryQuery {
    pub question_set_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackPreviewRequest {
    pub user_answer: String,
    pub expected_answer: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPreviewResponse {
    pub feedback: String,
    pub message: String,
}

/// POST /api/v1/answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let response = submit_answer(state.store.as_ref(), state.llm.as_ref(), req).await?;
    Ok(Json(response))
}

/// GET /api/v1/answers
pub async fn handle_answer_history(
    State(state): State<AppState>,
    Query(params): Query<AnswerHistoryQuery>,
) -> Result<Json<Vec<AnswerRecord>>, AppError> {
    let records = state
        .store
        .recent_answers(params.question_set_id, history_limit(params.limit))
        .await?;
    Ok(Json(records))
}

/// POST /api/v1/feedback/preview
///
/// Evaluates an ad-hoc answer pair without storing anything.
pub async fn handle_feedback_preview(
    State(state): State<AppState>,
    Json(req): Json<FeedbackPreviewRequest>,
) -> Result<Json<FeedbackPreviewResponse>, AppError> {
    if req.user_answer.trim().is_empty() || req.expected_answer.trim().is_empty() {
        return Err(AppError::Validation(
            "Both user_answer and expected_answer are required".to_string(),
        ));
    }

    let feedback =
        compare_and_provide_feedback(state.llm.as_ref(), &req.user_answer, &req.expected_answer)
            .await;
    Ok(Json(FeedbackPreviewResponse {
        feedback,
        message: "Feedback generated".to_string(),
    }))
}
