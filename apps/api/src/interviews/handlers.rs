//! Axum route handlers for the Interviews API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::interviews::repository::{
    get_interview_by_id, get_interviews_by_user_id, get_latest_interviews,
};
use crate::models::interview::Interview;
use crate::state::AppState;
use crate::store::Lookup;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Interview>, AppError> {
    match get_interview_by_id(state.store.as_ref(), &id).await {
        Lookup::Found(interview) => Ok(Json(interview)),
        Lookup::NotFound => Err(AppError::NotFound(format!("Interview {id} not found"))),
        Lookup::Unavailable(e) => Err(AppError::Store(e)),
    }
}

/// GET /api/v1/interviews?user_id=
///
/// The requesting user's own interviews, newest first.
pub async fn handle_list_user_interviews(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let interviews = get_interviews_by_user_id(state.store.as_ref(), &params.user_id).await?;
    Ok(Json(interviews))
}

/// GET /api/v1/interviews/latest?user_id=&limit=
///
/// Finalized interviews from other users, newest first.
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    Query(params): Query<LatestQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let limit = params.limit.unwrap_or(state.config.latest_interviews_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let interviews = get_latest_interviews(state.store.as_ref(), &params.user_id, limit).await?;
    Ok(Json(interviews))
}
