//! Process-local `DocumentStore`. Backs tests and `STORE_BACKEND=memory`.
//!
//! Query semantics follow the hosted document store the service was built
//! against:
//! - `!=` never matches a document that lacks the field.
//! - Ordering on a field drops documents that lack it. Timestamp ordering
//!   also drops documents whose field is not an RFC 3339 string.
//! - Unordered results come back in document-id order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    Direction, Document, DocumentStore, FieldOp, OrderBy, OrderKind, Query, StoreError,
};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|(_, data)| {
                query.filters.iter().all(|filter| {
                    let field = field_value(data, &filter.field);
                    match filter.op {
                        FieldOp::Eq => field == Some(&filter.value),
                        FieldOp::NotEq => field.is_some_and(|v| v != &filter.value),
                    }
                })
            })
            .filter(|(_, data)| {
                query
                    .order_by
                    .as_ref()
                    .map_or(true, |order| is_orderable(data, order))
            })
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect();

        if let Some(order) = &query.order_by {
            matched.sort_by(|a, b| {
                let ordering = match order.kind {
                    OrderKind::Value => compare_values(
                        field_value(&a.data, &order.field),
                        field_value(&b.data, &order.field),
                    ),
                    OrderKind::Timestamp => timestamp_value(&a.data, &order.field)
                        .cmp(&timestamp_value(&b.data, &order.field)),
                };
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        debug!(
            "memory query on '{}' matched {} documents",
            query.collection,
            matched.len()
        );
        Ok(matched)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        if !data.is_object() {
            return Err(StoreError::Backend(format!(
                "document {collection}/{id} must be a JSON object"
            )));
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }
}

/// Resolves a dotted field path (`a.b.c`) inside a document.
fn field_value<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(data, |current, segment| current.get(segment))
}

fn is_orderable(data: &Value, order: &OrderBy) -> bool {
    match order.kind {
        OrderKind::Value => field_value(data, &order.field).is_some(),
        OrderKind::Timestamp => timestamp_value(data, &order.field).is_some(),
    }
}

fn timestamp_value(data: &Value, path: &str) -> Option<DateTime<Utc>> {
    let raw = field_value(data, path)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Cross-type order: null < bool < number < string < array < object.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        store
            .set("interviews", "a", json!({"userId": "u1", "finalized": true, "createdAt": "2024-01-01T00:00:00.000000000Z"}))
            .await
            .unwrap();
        store
            .set("interviews", "b", json!({"userId": "u2", "finalized": true, "createdAt": "2024-03-01T00:00:00.000000000Z"}))
            .await
            .unwrap();
        store
            .set("interviews", "c", json!({"userId": "u3", "finalized": false, "createdAt": "2024-02-01T00:00:00.000000000Z"}))
            .await
            .unwrap();
        store
            .set("interviews", "d", json!({"finalized": true, "createdAt": "2024-04-01T00:00:00.000000000Z"}))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_document() {
        let store = seeded().await;
        assert!(store.get("interviews", "zzz").await.unwrap().is_none());
        assert!(store.get("nope", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_existing_document() {
        let store = seeded().await;
        store
            .set("interviews", "a", json!({"userId": "u9"}))
            .await
            .unwrap();
        let doc = store.get("interviews", "a").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"userId": "u9"}));
    }

    #[tokio::test]
    async fn test_set_rejects_non_object_payload() {
        let store = MemoryDocumentStore::new();
        assert!(store.set("interviews", "x", json!(42)).await.is_err());
    }

    #[tokio::test]
    async fn test_not_equal_skips_documents_missing_the_field() {
        let store = seeded().await;
        let query = Query::collection("interviews").where_ne("userId", "u1");
        let ids: Vec<String> = store
            .query(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_order_desc_then_limit() {
        let store = seeded().await;
        let query = Query::collection("interviews")
            .where_eq("finalized", true)
            .order_by("createdAt", Direction::Desc)
            .limit(2);
        let ids: Vec<String> = store
            .query(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["d", "b"]);
    }

    #[tokio::test]
    async fn test_order_by_missing_field_drops_document() {
        let store = seeded().await;
        store
            .set("interviews", "e", json!({"userId": "u5"}))
            .await
            .unwrap();
        let query = Query::collection("interviews").order_by("createdAt", Direction::Asc);
        let ids: Vec<String> = store
            .query(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }

    #[tokio::test]
    async fn test_timestamp_order_compares_instants_not_strings() {
        let store = MemoryDocumentStore::new();
        for (id, created_at) in [
            ("whole_seconds", "2024-05-01T10:00:00Z"),
            ("millis", "2024-05-01T10:00:00.500Z"),
            ("offset", "2024-05-01T12:00:01+02:00"),
            ("nanos", "2024-05-01T09:59:59.999999999Z"),
            ("garbage", "last tuesday"),
        ] {
            store
                .set("interviews", id, json!({"createdAt": created_at}))
                .await
                .unwrap();
        }

        let query = Query::collection("interviews").order_by_time("createdAt", Direction::Desc);
        let ids: Vec<String> = store
            .query(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["offset", "millis", "whole_seconds", "nanos"]);
    }

    #[test]
    fn test_field_value_resolves_dotted_paths() {
        let data = json!({"meta": {"owner": {"id": "u1"}}});
        assert_eq!(field_value(&data, "meta.owner.id"), Some(&json!("u1")));
        assert_eq!(field_value(&data, "meta.missing"), None);
    }

    #[test]
    fn test_compare_values_orders_across_types() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(false)), Some(&json!("a"))),
            Ordering::Less
        );
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
    }
}
