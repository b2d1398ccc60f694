use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One submitted answer with the feedback it received. Never mutated.
///
/// `question_set_id` is a lookup reference only; the question text, expected
/// answer and skills are copied in so history survives on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnswerRecord {
    pub id: Uuid,
    pub question_set_id: Uuid,
    pub question_index: i32,
    pub question_text: String,
    pub user_answer: String,
    pub feedback: String,
    pub expected_answer: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}
