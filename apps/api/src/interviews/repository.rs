//! Interview reads. Interviews are written by the interview-taking flow; this
//! service only looks them up and lists them.

use tracing::error;

use crate::models::interview::Interview;
use crate::models::timestamp::newest_first;
use crate::store::record::{decode, decode_valid, Record};
use crate::store::{Direction, DocumentStore, Lookup, Query, StoreError};

pub const DEFAULT_LATEST_LIMIT: usize = 20;

/// Fetches one interview by id, merged with its id.
pub async fn get_interview_by_id(store: &dyn DocumentStore, id: &str) -> Lookup<Interview> {
    let document = match store.get(Interview::COLLECTION, id).await {
        Ok(Some(document)) => document,
        Ok(None) => return Lookup::NotFound,
        Err(e) => {
            error!("Error getting interview {id}: {e}");
            return Lookup::Unavailable(e);
        }
    };

    match decode::<Interview>(document) {
        Ok(interview) => Lookup::Found(interview),
        Err(e) => {
            error!("Error decoding interview {id}: {e}");
            Lookup::Unavailable(e)
        }
    }
}

/// Finalized interviews owned by anyone except `user_id`, newest first.
pub async fn get_latest_interviews(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: usize,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::collection(Interview::COLLECTION)
        .where_eq("finalized", true)
        .where_ne("userId", user_id)
        .order_by_time("createdAt", Direction::Desc)
        .limit(limit);

    let documents = store.query(&query).await.map_err(|e| {
        error!("Error getting latest interviews: {e}");
        e
    })?;

    Ok(decode_valid(documents))
}

/// All interviews owned by `user_id`, newest first.
///
/// The store query is unordered; sorting happens here so no composite index
/// on `(userId, createdAt)` is needed.
pub async fn get_interviews_by_user_id(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::collection(Interview::COLLECTION).where_eq("userId", user_id);

    let documents = store.query(&query).await.map_err(|e| {
        error!("Error getting interviews for user {user_id}: {e}");
        e
    })?;

    let mut interviews: Vec<Interview> = decode_valid(documents);
    interviews.sort_by(|a, b| newest_first(&a.created_at, &b.created_at));
    Ok(interviews)
}
