//! Answer submission: look up the pair, evaluate, record best-effort.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::compare_and_provide_feedback;
use crate::llm_client::ChatCompletion;
use crate::models::answer::AnswerRecord;
use crate::store::Store;

pub const ANSWER_SUBMITTED_MESSAGE: &str = "Answer submitted successfully";

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_set_id: Uuid,
    pub question_index: i64,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub feedback: String,
    pub expected_answer: String,
    pub message: String,
}

/// Evaluates one answer against the stored expected answer.
///
/// The feedback is returned even when the answer record cannot be saved.
pub async fn submit_answer(
    store: &dyn Store,
    llm: &dyn ChatCompletion,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("Answer must not be empty".to_string()));
    }

    let set = store
        .find_question_set(request.question_set_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Question set {} not found", request.question_set_id))
        })?;

    let index = usize::try_from(request.question_index)
        .map_err(|_| AppError::Validation("Question index out of bounds".to_string()))?;
    let (question, expected) = set
        .pair(index)
        .ok_or_else(|| AppError::Validation("Question index out of bounds".to_string()))?;

    let feedback = compare_and_provide_feedback(llm, &request.answer, expected).await;

    let record = AnswerRecord {
        id: Uuid::new_v4(),
        question_set_id: set.id,
        question_index: index as i32,
        question_text: question.to_string(),
        user_answer: request.answer,
        feedback: feedback.clone(),
        expected_answer: expected.to_string(),
        skills: set.skills.clone(),
        created_at: chrono::Utc::now(),
    };

    match store.insert_answer(&record).await {
        Ok(()) => info!(
            "Recorded answer {} for question set {} index {}",
            record.id, set.id, index
        ),
        Err(e) => warn!("Failed to save answer record for set {}: {e}", set.id),
    }

    Ok(SubmitAnswerResponse {
        feedback,
        expected_answer: record.expected_answer,
        message: ANSWER_SUBMITTED_MESSAGE.to_string(),
    })
}
