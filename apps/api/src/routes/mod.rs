pub mod health;

use axum::{routing::get, Router};

use crate::feedback::handlers as feedback;
use crate::interviews::handlers as interviews;
use crate::pages::handlers as pages;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(pages::handle_dashboard))
        .route("/interview/lookup", get(pages::handle_lookup))
        .route("/interview/:id/feedback", get(pages::handle_feedback_page))
        // Interviews API
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_user_interviews),
        )
        .route(
            "/api/v1/interviews/latest",
            get(interviews::handle_latest_interviews),
        )
        .route("/api/v1/interviews/:id", get(interviews::handle_get_interview))
        // Feedback API
        .route(
            "/api/v1/feedback",
            get(feedback::handle_get_feedback).post(feedback::handle_create_feedback),
        )
        .with_state(state)
}
