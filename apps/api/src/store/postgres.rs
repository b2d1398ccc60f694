use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::answer::AnswerRecord;
use crate::models::question_set::QuestionSet;
use crate::models::user::User;
use crate::store::{Store, StoreError};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{what} already exists"))
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, username, email, created_at) VALUES ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "A user with this username or email"))?;

        info!("Inserted user {}", user.id);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_question_set(&self, set: &QuestionSet) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO question_sets
                (id, user_id, source, questions, expected_answers, skills, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(set.id)
        .bind(set.user_id)
        .bind(&set.source)
        .bind(&set.questions)
        .bind(&set.expected_answers)
        .bind(&set.skills)
        .bind(set.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Inserted question set {} ({} questions)",
            set.id,
            set.questions.len()
        );
        Ok(())
    }

    async fn find_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>, StoreError> {
        let set = sqlx::query_as::<_, QuestionSet>(
            r#"
            SELECT id, user_id, source, questions, expected_answers, skills, created_at
            FROM question_sets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(set)
    }

    async fn recent_question_sets(
        &self,
        user_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<QuestionSet>, StoreError> {
        let sets = sqlx::query_as::<_, QuestionSet>(
            r#"
            SELECT id, user_id, source, questions, expected_answers, skills, created_at
            FROM question_sets
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(sets)
    }

    async fn insert_answer(&self, record: &AnswerRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO answer_records
                (id, question_set_id, question_index, question_text, user_answer,
                 feedback, expected_answer, skills, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id)
        .bind(record.question_set_id)
        .bind(record.question_index)
        .bind(&record.question_text)
        .bind(&record.user_answer)
        .bind(&record.feedback)
        .bind(&record.expected_answer)
        .bind(&record.skills)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_answers(
        &self,
        question_set_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let records = sqlx::query_as::<_, AnswerRecord>(
            r#"
            SELECT id, question_set_id, question_index, question_text, user_answer,
                   feedback, expected_answer, skills, created_at
            FROM answer_records
            WHERE $1::uuid IS NULL OR question_set_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(question_set_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
