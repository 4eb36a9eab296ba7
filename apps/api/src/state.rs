use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::StructuredGenerator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production, in-memory for development and tests.
    pub store: Arc<dyn DocumentStore>,
    /// Default: `LlmClient`. Tests swap in a canned generator.
    pub generator: Arc<dyn StructuredGenerator>,
    pub config: Config,
}
