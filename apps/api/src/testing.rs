//! Test doubles shared by the unit tests of several modules.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::{Config, StoreBackend};
use crate::llm_client::{LlmError, StructuredGenerator, StructuredRequest};
use crate::state::AppState;
use crate::store::{Document, DocumentStore, MemoryDocumentStore, Query, StoreError};

/// Returns a canned response and records every prompt it receives.
pub struct FakeGenerator {
    response: Result<Value, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn returning(value: Value) -> Self {
        Self {
            response: Ok(value),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StructuredGenerator for FakeGenerator {
    async fn generate(&self, request: StructuredRequest<'_>) -> Result<Value, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(LlmError::Api {
                status: 529,
                message: message.clone(),
            }),
        }
    }
}

/// A store whose backend is always down.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn query(&self, _query: &Query) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn set(&self, _collection: &str, _id: &str, _data: Value) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        database_url: None,
        anthropic_api_key: "test-key".to_string(),
        anthropic_api_url: None,
        port: 0,
        rust_log: "debug".to_string(),
        latest_interviews_limit: 20,
    }
}

pub fn test_state(store: Arc<dyn DocumentStore>, generator: Arc<dyn StructuredGenerator>) -> AppState {
    AppState {
        store,
        generator,
        config: test_config(),
    }
}

pub async fn seed_interview(
    store: &MemoryDocumentStore,
    id: &str,
    user_id: &str,
    created_at: &str,
    finalized: bool,
) {
    store
        .set(
            "interviews",
            id,
            json!({
                "userId": user_id,
                "role": "backend engineer",
                "type": "Technical",
                "techstack": ["Rust", "PostgreSQL"],
                "createdAt": created_at,
                "finalized": finalized
            }),
        )
        .await
        .unwrap();
}

/// A well-formed evaluation covering all five categories.
pub fn generated_feedback() -> Value {
    json!({
        "totalScore": 74,
        "categoryScores": [
            {"name": "Technical Knowledge", "score": 80, "comment": "Knows the borrow checker well."},
            {"name": "Communication Skills", "score": 70, "comment": "Some rambling."},
            {"name": "Problem-Solving", "score": 75, "comment": "Broke the problem down."},
            {"name": "Cultural & Role Fit", "score": 72, "comment": "Good team instincts."},
            {"name": "Confidence & Clarity", "score": 68, "comment": "Hesitant at times."}
        ],
        "strengths": ["Strong fundamentals"],
        "areasForImprovement": ["Tighter answers"],
        "finalAssessment": "A capable candidate who should practise concise delivery."
    })
}
