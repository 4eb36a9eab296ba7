use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;
use crate::store::record::Record;

pub const MAX_SCORE: u32 = 100;

/// The five fixed evaluation dimensions. Aliases accept the spellings used by
/// older feedback documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryName {
    #[serde(rename = "Communication Skills")]
    CommunicationSkills,
    #[serde(rename = "Technical Knowledge")]
    TechnicalKnowledge,
    #[serde(rename = "Problem-Solving", alias = "Problem Solving")]
    ProblemSolving,
    #[serde(rename = "Cultural & Role Fit", alias = "Cultural Fit")]
    CulturalAndRoleFit,
    #[serde(rename = "Confidence & Clarity", alias = "Confidence and Clarity")]
    ConfidenceAndClarity,
}

impl CategoryName {
    pub const ALL: [CategoryName; 5] = [
        CategoryName::CommunicationSkills,
        CategoryName::TechnicalKnowledge,
        CategoryName::ProblemSolving,
        CategoryName::CulturalAndRoleFit,
        CategoryName::ConfidenceAndClarity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryName::CommunicationSkills => "Communication Skills",
            CategoryName::TechnicalKnowledge => "Technical Knowledge",
            CategoryName::ProblemSolving => "Problem-Solving",
            CategoryName::CulturalAndRoleFit => "Cultural & Role Fit",
            CategoryName::ConfidenceAndClarity => "Confidence & Clarity",
        }
    }

    /// What the evaluator is asked to look for in this dimension.
    pub fn rubric(&self) -> &'static str {
        match self {
            CategoryName::CommunicationSkills => "Clarity, articulation, structured responses.",
            CategoryName::TechnicalKnowledge => "Understanding of key concepts for the role.",
            CategoryName::ProblemSolving => {
                "Ability to analyze problems and propose solutions."
            }
            CategoryName::CulturalAndRoleFit => "Alignment with company values and job role.",
            CategoryName::ConfidenceAndClarity => {
                "Confidence in responses, engagement, and clarity."
            }
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    pub name: CategoryName,
    pub score: u32,
    pub comment: String,
}

/// AI-generated evaluation of one interview for one user. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub total_score: u32,
    #[serde(default)]
    pub category_scores: Vec<CategoryScore>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub final_assessment: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Record for Feedback {
    const COLLECTION: &'static str = "feedback";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.interview_id.trim().is_empty() {
            return Err("interviewId cannot be empty".to_string());
        }
        if self.user_id.trim().is_empty() {
            return Err("userId cannot be empty".to_string());
        }
        validate_scores(self.total_score, &self.category_scores)
    }
}

/// Score ranges and category uniqueness. Shared by stored and generated feedback.
pub fn validate_scores(total_score: u32, categories: &[CategoryScore]) -> Result<(), String> {
    if total_score > MAX_SCORE {
        return Err(format!("totalScore {total_score} exceeds {MAX_SCORE}"));
    }

    let mut seen = HashSet::new();
    for category in categories {
        if category.score > MAX_SCORE {
            return Err(format!(
                "score {} for '{}' exceeds {MAX_SCORE}",
                category.score, category.name
            ));
        }
        if !seen.insert(category.name) {
            return Err(format!("category '{}' appears more than once", category.name));
        }
    }
    Ok(())
}

/// Generated feedback must cover every category exactly once.
pub fn validate_complete(categories: &[CategoryScore]) -> Result<(), String> {
    let missing: Vec<&str> = CategoryName::ALL
        .iter()
        .filter(|name| !categories.iter().any(|c| c.name == **name))
        .map(CategoryName::as_str)
        .collect();

    if !missing.is_empty() {
        return Err(format!("missing categories: {}", missing.join(", ")));
    }
    if categories.len() != CategoryName::ALL.len() {
        return Err(format!(
            "expected {} categories, got {}",
            CategoryName::ALL.len(),
            categories.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score(name: CategoryName, score: u32) -> CategoryScore {
        CategoryScore {
            name,
            score,
            comment: "ok".to_string(),
        }
    }

    #[test]
    fn test_category_names_use_display_strings_on_the_wire() {
        let json = serde_json::to_string(&CategoryName::CulturalAndRoleFit).unwrap();
        assert_eq!(json, r#""Cultural & Role Fit""#);
    }

    #[test]
    fn test_category_aliases_accept_legacy_spellings() {
        let legacy: Vec<CategoryName> =
            serde_json::from_str(r#"["Problem Solving", "Cultural Fit", "Confidence and Clarity"]"#)
                .unwrap();
        assert_eq!(
            legacy,
            vec![
                CategoryName::ProblemSolving,
                CategoryName::CulturalAndRoleFit,
                CategoryName::ConfidenceAndClarity
            ]
        );
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result: Result<CategoryName, _> = serde_json::from_str(r#""Leadership""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_feedback_round_trips_camel_case_document() {
        let value = json!({
            "id": "f1",
            "interviewId": "i1",
            "userId": "u1",
            "totalScore": 82,
            "categoryScores": [
                {"name": "Communication Skills", "score": 90, "comment": "Crisp"}
            ],
            "strengths": ["Clear answers"],
            "areasForImprovement": ["More examples"],
            "finalAssessment": "Solid candidate.",
            "createdAt": "2024-05-01T10:00:00.000000000Z"
        });

        let feedback: Feedback = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(feedback.total_score, 82);
        assert_eq!(feedback.category_scores[0].name, CategoryName::CommunicationSkills);
        assert_eq!(serde_json::to_value(&feedback).unwrap(), value);
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        assert!(validate_scores(101, &[]).is_err());
        let err = validate_scores(80, &[score(CategoryName::TechnicalKnowledge, 120)]).unwrap_err();
        assert!(err.contains("Technical Knowledge"));
    }

    #[test]
    fn test_validate_rejects_duplicate_categories() {
        let categories = vec![
            score(CategoryName::TechnicalKnowledge, 70),
            score(CategoryName::TechnicalKnowledge, 75),
        ];
        let err = validate_scores(70, &categories).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_validate_complete_names_missing_categories() {
        let categories = vec![
            score(CategoryName::CommunicationSkills, 70),
            score(CategoryName::TechnicalKnowledge, 75),
        ];
        let err = validate_complete(&categories).unwrap_err();
        assert!(err.contains("Problem-Solving"));
        assert!(err.contains("Confidence & Clarity"));
    }

    #[test]
    fn test_validate_complete_accepts_all_five() {
        let categories: Vec<CategoryScore> =
            CategoryName::ALL.iter().map(|name| score(*name, 60)).collect();
        assert!(validate_complete(&categories).is_ok());
    }
}
