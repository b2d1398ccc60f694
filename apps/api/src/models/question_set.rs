use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Question set built from an uploaded resume document.
pub const SOURCE_RESUME: &str = "resume";
/// Question set built from a voice transcription.
pub const SOURCE_VOICE: &str = "voice";

/// The immutable bundle of generated questions, their ideal answers and the
/// skills that produced them.
///
/// `questions` and `expected_answers` are aligned by index; `new` enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuestionSet {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub source: String,
    pub questions: Vec<String>,
    pub expected_answers: Vec<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl QuestionSet {
    pub fn new(
        user_id: Option<Uuid>,
        source: &str,
        questions: Vec<String>,
        expected_answers: Vec<String>,
        skills: Vec<String>,
    ) -> Result<Self, AppError> {
        if questions.len() != expected_answers.len() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "question set misaligned: {} questions vs {} expected answers",
                questions.len(),
                expected_answers.len()
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            source: source.to_string(),
            questions,
            expected_answers,
            skills,
            created_at: Utc::now(),
        })
    }

    /// Returns the (question, expected answer) pair at `index`, if in range.
    pub fn pair(&self, index: usize) -> Option<(&str, &str)> {
        let question = self.questions.get(index)?;
        let answer = self.expected_answers.get(index)?;
        Some((question.as_str(), answer.as_str()))
    }
}
