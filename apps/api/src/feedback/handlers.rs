//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::feedback::generator::{create_feedback, CreateFeedbackRequest, CreateFeedbackResponse};
use crate::feedback::repository::get_feedback_by_interview_id;
use crate::models::feedback::Feedback;
use crate::state::AppState;
use crate::store::Lookup;

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub interview_id: String,
    pub user_id: String,
}

/// GET /api/v1/feedback?interview_id=&user_id=
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
) -> Result<Json<Feedback>, AppError> {
    match get_feedback_by_interview_id(state.store.as_ref(), &params.interview_id, &params.user_id)
        .await
    {
        Lookup::Found(feedback) => Ok(Json(feedback)),
        Lookup::NotFound => Err(AppError::NotFound(format!(
            "No feedback for interview {}",
            params.interview_id
        ))),
        Lookup::Unavailable(e) => Err(AppError::Store(e)),
    }
}

/// POST /api/v1/feedback
///
/// Evaluates the transcript with the LLM and stores the resulting feedback.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<CreateFeedbackResponse>), AppError> {
    let response =
        create_feedback(state.store.as_ref(), state.generator.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
