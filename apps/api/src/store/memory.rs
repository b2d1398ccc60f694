use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::answer::AnswerRecord;
use crate::models::question_set::QuestionSet;
use crate::models::user::User;
use crate::store::{Store, StoreError};

/// In-process store used when no database is configured, and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    question_sets: RwLock<HashMap<Uuid, QuestionSet>>,
    answers: RwLock<Vec<AnswerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let taken = users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken || users.contains_key(&user.id) {
            return Err(StoreError::Conflict(
                "A user with this username or email already exists".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_question_set(&self, set: &QuestionSet) -> Result<(), StoreError> {
        let mut sets = self.question_sets.write().await;
        if sets.contains_key(&set.id) {
            return Err(StoreError::Conflict(format!(
                "Question set {} already exists",
                set.id
            )));
        }
        sets.insert(set.id, set.clone());
        Ok(())
    }

    async fn find_question_set(&self, id: Uuid) -> Result<Option<QuestionSet>, StoreError> {
        Ok(self.question_sets.read().await.get(&id).cloned())
    }

    async fn recent_question_sets(
        &self,
        user_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<QuestionSet>, StoreError> {
        let mut sets: Vec<QuestionSet> = self
            .question_sets
            .read()
            .await
            .values()
            .filter(|s| user_id.is_none() || s.user_id == user_id)
            .cloned()
            .collect();
        sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sets.truncate(clamp_limit(limit));
        Ok(sets)
    }

    async fn insert_answer(&self, record: &AnswerRecord) -> Result<(), StoreError> {
        self.answers.write().await.push(record.clone());
        Ok(())
    }

    async fn recent_answers(
        &self,
        question_set_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let mut records: Vec<AnswerRecord> = self
            .answers
            .read()
            .await
            .iter()
            .filter(|r| question_set_id.map_or(true, |id| r.question_set_id == id))
            .cloned()
            .collect();
        // Stable sort: records with equal timestamps keep newest-inserted first.
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(clamp_limit(limit));
        Ok(records)
    }
}
