//! Page view models and the askama templates they fill.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::models::feedback::Feedback;
use crate::models::interview::Interview;

const DEFAULT_ROLE: &str = "Technical";

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub user_id: &'a str,
    pub own: InterviewListing,
    pub latest: InterviewListing,
    /// Pre-rendered `FormField` markup.
    pub lookup_field: String,
}

#[derive(Template)]
#[template(path = "feedback.html")]
pub struct FeedbackPage<'a> {
    pub role: String,
    pub feedback: &'a Feedback,
    pub created: String,
    pub dashboard_href: String,
    pub retake_href: String,
}

#[derive(Template)]
#[template(path = "no_feedback.html")]
pub struct NoFeedbackPage {
    pub dashboard_href: String,
}

/// One dashboard section. `unavailable` is set when the store could not answer,
/// so the page can say so instead of showing an empty list.
#[derive(Debug, Default)]
pub struct InterviewListing {
    pub cards: Vec<InterviewCard>,
    pub unavailable: bool,
}

impl InterviewListing {
    pub fn from_result<E>(result: Result<Vec<Interview>, E>, user_id: &str) -> Self {
        match result {
            Ok(interviews) => Self {
                cards: interviews
                    .iter()
                    .map(|interview| InterviewCard::new(interview, user_id))
                    .collect(),
                unavailable: false,
            },
            Err(_) => Self {
                cards: Vec::new(),
                unavailable: true,
            },
        }
    }
}

#[derive(Debug)]
pub struct InterviewCard {
    pub role: String,
    pub interview_type: String,
    pub techstack: String,
    pub created: String,
    pub feedback_href: String,
}

impl InterviewCard {
    pub fn new(interview: &Interview, user_id: &str) -> Self {
        Self {
            role: display_role(&interview.role),
            interview_type: interview.interview_type.clone(),
            techstack: interview.techstack.join(", "),
            created: format_date(&interview.created_at),
            feedback_href: feedback_href(&interview.id, user_id),
        }
    }
}

/// Capitalizes each word of the role, falling back to "Technical".
pub fn display_role(role: &str) -> String {
    let words: Vec<String> = role
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        DEFAULT_ROLE.to_string()
    } else {
        words.join(" ")
    }
}

/// `May 1, 2024 10:30 AM`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %-I:%M %p").to_string()
}

pub fn dashboard_href(user_id: &str) -> String {
    format!("/?user_id={}", urlencoding::encode(user_id))
}

pub fn feedback_href(interview_id: &str, user_id: &str) -> String {
    format!(
        "/interview/{}/feedback?user_id={}",
        urlencoding::encode(interview_id),
        urlencoding::encode(user_id)
    )
}

pub fn interview_href(interview_id: &str) -> String {
    format!("/interview/{}", urlencoding::encode(interview_id))
}
