//! Entity recognition seam.
//!
//! Organization and product entities are a noisy, supplementary skill signal.
//! `HttpEntityRecognizer` talks to a spaCy-style sidecar; `NoopEntityRecognizer`
//! is used when none is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum EntityLabel {
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "PRODUCT")]
    Product,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, EntityError>;
}

/// Keeps the text of organization and product entities, in order.
pub fn skill_candidates(entities: &[Entity]) -> Vec<String> {
    entities
        .iter()
        .filter(|e| matches!(e.label, EntityLabel::Organization | EntityLabel::Product))
        .map(|e| e.text.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub struct NoopEntityRecognizer;

#[async_trait]
impl EntityRecognizer for NoopEntityRecognizer {
    async fn entities(&self, _text: &str) -> Result<Vec<Entity>, EntityError> {
        Ok(Vec::new())
    }
}

#[derive(Serialize)]
struct EntityRequest<'a> {
    text: &'a str,
}

/// Posts `{"text": ...}` and expects a JSON array of `{text, label}`.
pub struct HttpEntityRecognizer {
    client: Client,
    url: String,
}

impl HttpEntityRecognizer {
    pub fn new(url: String, timeout: Duration) -> Result<Self, EntityError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, EntityError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EntityRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EntityError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<Vec<Entity>>().await?)
    }
}
