use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;
use crate::store::record::Record;

/// Metadata for one mock-interview session. Read-only in this service; the
/// interview-taking flow writes these documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default)]
    pub interview_type: String,
    #[serde(default)]
    pub techstack: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub finalized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Record for Interview {
    const COLLECTION: &'static str = "interviews";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("userId cannot be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interview_deserializes_original_document_shape() {
        let value = json!({
            "id": "i1",
            "userId": "u1",
            "role": "Full Stack Developer",
            "type": "Technical",
            "level": "Senior",
            "techstack": ["React", "Node.js"],
            "questions": ["Explain the event loop."],
            "coverImage": "/covers/adobe.png",
            "createdAt": "2024-05-01T10:00:00.123Z",
            "finalized": true
        });

        let interview: Interview = serde_json::from_value(value).unwrap();
        assert_eq!(interview.interview_type, "Technical");
        assert_eq!(interview.level.as_deref(), Some("Senior"));
        assert_eq!(interview.questions.len(), 1);
        assert!(interview.finalized);
        assert_eq!(interview.created_at.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let value = json!({
            "id": "i2",
            "userId": "u1",
            "createdAt": "2024-05-01T10:00:00Z"
        });

        let interview: Interview = serde_json::from_value(value).unwrap();
        assert!(!interview.finalized);
        assert!(interview.techstack.is_empty());
        assert_eq!(interview.role, "");
    }

    #[test]
    fn test_serializes_type_field_name() {
        let value = json!({
            "id": "i3",
            "userId": "u1",
            "type": "Behavioral",
            "createdAt": "2024-05-01T10:00:00Z"
        });
        let interview: Interview = serde_json::from_value(value).unwrap();
        let out = serde_json::to_value(&interview).unwrap();
        assert_eq!(out["type"], "Behavioral");
        assert_eq!(out["createdAt"], "2024-05-01T10:00:00.000000000Z");
        assert!(out.get("coverImage").is_none());
    }
}
