//! Question-set pipeline.
//!
//! Flow: extract_info → generate_questions → generate_expected_answers →
//!       QuestionSet::new → store.insert_question_set → summary.
//!
//! Shared by the resume upload and the voice transcription endpoints; only
//! the text source and the `source` tag differ.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::entities::EntityRecognizer;
use crate::extraction::skills::extract_info;
use crate::llm_client::ChatCompletion;
use crate::models::question_set::QuestionSet;
use crate::questions::generator::{generate_expected_answers, generate_questions};
use crate::store::Store;

/// What the caller gets back after a set is created and persisted.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetSummary {
    pub question_set_id: Uuid,
    pub questions: Vec<String>,
    pub skills: Vec<String>,
}

/// Runs the full pipeline over already-extracted `text` and persists the result.
///
/// Steps:
/// 1. reject an unknown `user_id` before spending any LLM calls
/// 2. extract_info() → skills + experience
/// 3. generate_questions() → up to 15 questions (or the no-skills message)
/// 4. generate_expected_answers() → one ideal answer per question
/// 5. INSERT the set; a failed save fails the whole operation
pub async fn create_question_set(
    store: &dyn Store,
    llm: &dyn ChatCompletion,
    recognizer: &dyn EntityRecognizer,
    text: &str,
    user_id: Option<Uuid>,
    source: &str,
) -> Result<QuestionSetSummary, AppError> {
    if let Some(id) = user_id {
        if store.find_user(id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }
    }

    let profile = extract_info(llm, recognizer, text).await?;
    info!(
        "Building {source} question set from {} skills",
        profile.skills.len()
    );

    let questions = generate_questions(llm, &profile.skills, &profile.raw_text).await?;
    let expected_answers =
        generate_expected_answers(llm, &questions, &profile.skills, &profile.raw_text).await?;

    let set = QuestionSet::new(
        user_id,
        source,
        questions,
        expected_answers,
        profile.skills,
    )?;
    store.insert_question_set(&set).await?;
    info!(
        "Stored question set {} with {} questions",
        set.id,
        set.questions.len()
    );

    Ok(QuestionSetSummary {
        question_set_id: set.id,
        questions: set.questions,
        skills: set.skills,
    })
}
