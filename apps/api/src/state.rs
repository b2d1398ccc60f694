use std::sync::Arc;

use crate::config::Config;
use crate::extraction::entities::EntityRecognizer;
use crate::llm_client::ChatCompletion;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is built once in `main` and swapped for fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn ChatCompletion>,
    /// `NoopEntityRecognizer` when NER_URL is unset.
    pub entities: Arc<dyn EntityRecognizer>,
    pub config: Config,
}
