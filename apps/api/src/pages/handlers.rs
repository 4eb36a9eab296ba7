//! Server-rendered pages. Reads here keep the soft-fail policy: a missing or
//! unreachable record becomes a redirect or a fallback page, never an error page.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::feedback::repository::get_feedback_by_interview_id;
use crate::interviews::repository::{
    get_interview_by_id, get_interviews_by_user_id, get_latest_interviews,
};
use crate::pages::form::{FormField, FormState};
use crate::pages::views::{
    dashboard_href, display_role, feedback_href, format_date, interview_href, DashboardPage,
    FeedbackPage, InterviewListing, NoFeedbackPage,
};
use crate::state::AppState;
use crate::store::Lookup;

const LOOKUP_FIELD: &str = "interview_id";

#[derive(Debug, Deserialize)]
pub struct PageUser {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub user_id: String,
    #[serde(default)]
    pub interview_id: String,
}

/// GET /?user_id=
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<PageUser>,
) -> Result<Html<String>, AppError> {
    render_dashboard(&state, &params.user_id, &FormState::new()).await
}

/// GET /interview/lookup?user_id=&interview_id=
pub async fn handle_lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Response, AppError> {
    let interview_id = params.interview_id.trim();
    if interview_id.is_empty() {
        let mut form = FormState::new().with_value(LOOKUP_FIELD, &params.interview_id);
        form.set_error(LOOKUP_FIELD, "Enter an interview ID");
        return Ok(render_dashboard(&state, &params.user_id, &form)
            .await?
            .into_response());
    }

    Ok(Redirect::to(&feedback_href(interview_id, &params.user_id)).into_response())
}

/// GET /interview/:id/feedback?user_id=
pub async fn handle_feedback_page(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Query(params): Query<PageUser>,
) -> Result<Response, AppError> {
    let dashboard = dashboard_href(&params.user_id);

    let interview = match get_interview_by_id(state.store.as_ref(), &interview_id).await {
        Lookup::Found(interview) => interview,
        Lookup::NotFound | Lookup::Unavailable(_) => {
            return Ok(Redirect::to(&dashboard).into_response());
        }
    };

    let feedback =
        match get_feedback_by_interview_id(state.store.as_ref(), &interview_id, &params.user_id)
            .await
        {
            Lookup::Found(feedback) => feedback,
            Lookup::NotFound => return render_no_feedback(dashboard),
            Lookup::Unavailable(e) => {
                warn!("Showing no-feedback page for interview {interview_id}: {e}");
                return render_no_feedback(dashboard);
            }
        };

    let page = FeedbackPage {
        role: display_role(&interview.role),
        feedback: &feedback,
        created: format_date(&feedback.created_at),
        dashboard_href: dashboard,
        retake_href: interview_href(&interview_id),
    };
    Ok(Html(page.render()?).into_response())
}

async fn render_dashboard(
    state: &AppState,
    user_id: &str,
    form: &FormState,
) -> Result<Html<String>, AppError> {
    let store = state.store.as_ref();
    let own = get_interviews_by_user_id(store, user_id).await;
    let latest = get_latest_interviews(store, user_id, state.config.latest_interviews_limit).await;

    let lookup_field = FormField::new(LOOKUP_FIELD, "Interview ID")
        .placeholder("Paste an interview ID")
        .render(form)?;

    let page = DashboardPage {
        user_id,
        own: InterviewListing::from_result(own, user_id),
        latest: InterviewListing::from_result(latest, user_id),
        lookup_field,
    };
    Ok(Html(page.render()?))
}

fn render_no_feedback(dashboard_href: String) -> Result<Response, AppError> {
    let page = NoFeedbackPage { dashboard_href };
    Ok(Html(page.render()?).into_response())
}
