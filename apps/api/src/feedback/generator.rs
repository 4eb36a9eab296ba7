//! Feedback generation: evaluates a transcript and persists the result.
//!
//! Flow: format transcript → structured LLM call (fixed prompt + schema) →
//!       validate → write to the `feedback` collection → return the id.
//!
//! Unlike the read paths, every failure here is returned to the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, FEEDBACK_TOOL_DESCRIPTION, FEEDBACK_TOOL_NAME,
};
use crate::feedback::repository::save_feedback;
use crate::llm_client::{generate_object, StructuredGenerator, StructuredRequest};
use crate::models::feedback::{
    validate_complete, validate_scores, CategoryName, CategoryScore, Feedback, MAX_SCORE,
};
use crate::models::transcript::{format_transcript, TranscriptEntry};
use crate::store::DocumentStore;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for feedback generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    /// When set, the feedback is written under this id, so a retried request
    /// overwrites instead of duplicating.
    #[serde(default)]
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackResponse {
    pub success: bool,
    pub feedback_id: String,
}

/// The object the model must return. Mirrors `feedback_output_schema`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFeedback {
    pub total_score: u32,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

/// JSON schema handed to the model as the tool's `input_schema`.
pub fn feedback_output_schema() -> Value {
    let names: Vec<&str> = CategoryName::ALL.iter().map(CategoryName::as_str).collect();

    json!({
        "type": "object",
        "properties": {
            "totalScore": {"type": "integer", "minimum": 0, "maximum": MAX_SCORE},
            "categoryScores": {
                "type": "array",
                "minItems": CategoryName::ALL.len(),
                "maxItems": CategoryName::ALL.len(),
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "enum": names},
                        "score": {"type": "integer", "minimum": 0, "maximum": MAX_SCORE},
                        "comment": {"type": "string"}
                    },
                    "required": ["name", "score", "comment"]
                }
            },
            "strengths": {"type": "array", "items": {"type": "string"}},
            "areasForImprovement": {"type": "array", "items": {"type": "string"}},
            "finalAssessment": {"type": "string"}
        },
        "required": [
            "totalScore",
            "categoryScores",
            "strengths",
            "areasForImprovement",
            "finalAssessment"
        ]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates feedback for a transcript and persists it.
///
/// Steps:
/// 1. reject empty input
/// 2. format the transcript as `- role: content` lines
/// 3. structured LLM call with the fixed prompt and output schema
/// 4. validate scores and category coverage
/// 5. write the Feedback document (id = `feedback_id` or a fresh UUID)
pub async fn create_feedback(
    store: &dyn DocumentStore,
    generator: &dyn StructuredGenerator,
    request: CreateFeedbackRequest,
) -> Result<CreateFeedbackResponse, AppError> {
    let interview_id = request.interview_id.clone();
    run_pipeline(store, generator, request).await.map_err(|e| {
        error!("Error creating feedback for interview {interview_id}: {e}");
        e
    })
}

async fn run_pipeline(
    store: &dyn DocumentStore,
    generator: &dyn StructuredGenerator,
    request: CreateFeedbackRequest,
) -> Result<CreateFeedbackResponse, AppError> {
    // Step 1: Input checks
    if request.interview_id.trim().is_empty() {
        return Err(AppError::Validation("interview_id cannot be empty".to_string()));
    }
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    if request.transcript.is_empty() {
        return Err(AppError::Validation("transcript cannot be empty".to_string()));
    }

    // Step 2-3: Prompt and structured call
    let prompt = build_feedback_prompt(&request.transcript);
    let schema = feedback_output_schema();
    info!(
        "Generating feedback for interview {} ({} transcript entries)",
        request.interview_id,
        request.transcript.len()
    );

    let generated: GeneratedFeedback = generate_object(
        generator,
        StructuredRequest {
            tool_name: FEEDBACK_TOOL_NAME,
            description: FEEDBACK_TOOL_DESCRIPTION,
            schema: &schema,
            prompt: &prompt,
            system: FEEDBACK_SYSTEM,
        },
    )
    .await
    .map_err(|e| AppError::Llm(format!("Feedback generation failed: {e}")))?;

    // Step 4: Validate
    validate_scores(generated.total_score, &generated.category_scores)
        .and_then(|()| validate_complete(&generated.category_scores))
        .map_err(|reason| AppError::Llm(format!("Generated feedback is invalid: {reason}")))?;

    // Step 5: Persist
    let feedback_id = request
        .feedback_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut category_scores = generated.category_scores;
    category_scores.sort_by_key(|c| CategoryName::ALL.iter().position(|name| *name == c.name));

    let feedback = Feedback {
        id: feedback_id.clone(),
        interview_id: request.interview_id,
        user_id: request.user_id,
        total_score: generated.total_score,
        category_scores,
        strengths: generated.strengths,
        areas_for_improvement: generated.areas_for_improvement,
        final_assessment: generated.final_assessment,
        created_at: Utc::now(),
    };

    save_feedback(store, &feedback).await?;

    info!(
        "Saved feedback {} for interview {} (total score {}/100)",
        feedback.id, feedback.interview_id, feedback.total_score
    );

    Ok(CreateFeedbackResponse {
        success: true,
        feedback_id,
    })
}

/// Fills the evaluation template with the formatted transcript and category rubric.
/// The transcript goes in last so placeholder text inside answers stays verbatim.
fn build_feedback_prompt(transcript: &[TranscriptEntry]) -> String {
    let categories = CategoryName::ALL
        .iter()
        .map(|name| format!("- **{}**: {}", name.as_str(), name.rubric()))
        .collect::<Vec<_>>()
        .join("\n");

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{categories}", &categories)
        .replace("{tool_name}", FEEDBACK_TOOL_NAME)
        .replace("{transcript}", &format_transcript(transcript))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
