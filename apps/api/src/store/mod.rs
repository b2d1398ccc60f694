//! Persistence seam — three keyed collections (users, question sets, answer
//! records) behind one async trait.
//!
//! `AppState` holds an `Arc<dyn Store>`: `PgStore` when `DATABASE_URL` is set,
//! `MemoryStore` otherwise and in tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::answer::AnswerRecord;
use crate::models::question_set::QuestionSet;
use crate::models::user::User;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Conflict(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. Duplicate username or email is `StoreError::Conflict`.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert_question_set(&self, set: &QuestionSet) -> Result<(), StoreError>;

    async fn find_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>, StoreError>;

    /// Newest first. `user_id = None` lists every set.
    async fn recent_question_sets(
        &self,
        user_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<QuestionSet>, StoreError>;

    async fn insert_answer(&self, record: &AnswerRecord) -> Result<(), StoreError>;

    /// Newest first. `question_set_id = None` lists every record.
    async fn recent_answers(
        &self,
        question_set_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<AnswerRecord>, StoreError>;
}
