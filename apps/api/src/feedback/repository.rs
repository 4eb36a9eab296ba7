use tracing::error;

use crate::models::feedback::Feedback;
use crate::store::record::{decode, encode, Record};
use crate::store::{DocumentStore, Lookup, Query, StoreError};

/// Feedback for one (interview, user) pair. Takes the first match; the store
/// does not enforce uniqueness.
pub async fn get_feedback_by_interview_id(
    store: &dyn DocumentStore,
    interview_id: &str,
    user_id: &str,
) -> Lookup<Feedback> {
    let query = Query::collection(Feedback::COLLECTION)
        .where_eq("interviewId", interview_id)
        .where_eq("userId", user_id)
        .limit(1);

    let document = match store.query(&query).await {
        Ok(documents) => match documents.into_iter().next() {
            Some(document) => document,
            None => return Lookup::NotFound,
        },
        Err(e) => {
            error!("Error getting feedback for interview {interview_id}: {e}");
            return Lookup::Unavailable(e);
        }
    };

    match decode::<Feedback>(document) {
        Ok(feedback) => Lookup::Found(feedback),
        Err(e) => {
            error!("Error decoding feedback for interview {interview_id}: {e}");
            Lookup::Unavailable(e)
        }
    }
}

/// Writes `feedback` under its own id, replacing any document already there.
pub async fn save_feedback(store: &dyn DocumentStore, feedback: &Feedback) -> Result<(), StoreError> {
    let data = encode(feedback)?;
    store.set(Feedback::COLLECTION, &feedback.id, data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use crate::testing::FailingStore;
    use serde_json::json;

    fn stored_feedback() -> serde_json::Value {
        json!({
            "interviewId": "i1",
            "userId": "u1",
            "totalScore": 82,
            "categoryScores": [
                {"name": "Communication Skills", "score": 90, "comment": "Clear and structured."}
            ],
            "strengths": ["Clear answers"],
            "areasForImprovement": ["More examples"],
            "finalAssessment": "Strong communicator.",
            "createdAt": "2024-05-01T10:30:00.000000000Z"
        })
    }

    #[tokio::test]
    async fn test_returns_stored_feedback_unmodified() {
        let store = MemoryDocumentStore::new();
        store.set("feedback", "f1", stored_feedback()).await.unwrap();

        let feedback = match get_feedback_by_interview_id(&store, "i1", "u1").await {
            Lookup::Found(feedback) => feedback,
            other => panic!("expected Found, got {other:?}"),
        };

        assert_eq!(feedback.id, "f1");
        assert_eq!(feedback.total_score, 82);
        assert_eq!(feedback.category_scores.len(), 1);
        assert_eq!(feedback.category_scores[0].score, 90);
        assert_eq!(feedback.strengths, vec!["Clear answers"]);
        assert_eq!(feedback.areas_for_improvement, vec!["More examples"]);

        let mut expected = stored_feedback();
        expected["id"] = json!("f1");
        assert_eq!(serde_json::to_value(&feedback).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_requires_both_interview_and_user_to_match() {
        let store = MemoryDocumentStore::new();
        store.set("feedback", "f1", stored_feedback()).await.unwrap();

        assert!(matches!(
            get_feedback_by_interview_id(&store, "i2", "u1").await,
            Lookup::NotFound
        ));
        assert!(matches!(
            get_feedback_by_interview_id(&store, "i1", "u2").await,
            Lookup::NotFound
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        assert!(matches!(
            get_feedback_by_interview_id(&FailingStore, "i1", "u1").await,
            Lookup::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_save_then_lookup() {
        let store = MemoryDocumentStore::new();
        store.set("feedback", "seed", stored_feedback()).await.unwrap();
        let mut feedback = match get_feedback_by_interview_id(&store, "i1", "u1").await {
            Lookup::Found(feedback) => feedback,
            other => panic!("expected Found, got {other:?}"),
        };
        feedback.id = "f2".to_string();
        feedback.interview_id = "i9".to_string();

        save_feedback(&store, &feedback).await.unwrap();

        let raw = store.get("feedback", "f2").await.unwrap().unwrap();
        assert!(raw.data.get("id").is_none());
        assert!(matches!(
            get_feedback_by_interview_id(&store, "i9", "u1").await,
            Lookup::Found(found) if found.id == "f2"
        ));
    }
}
