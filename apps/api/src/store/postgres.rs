//! PostgreSQL-backed `DocumentStore`.
//!
//! All collections share one `documents` table keyed by `(collection, id)`
//! with a JSONB payload. Field filters compile to `data #> '{path}'` comparisons
//! against JSONB-encoded values, so the semantics match the memory store for
//! equality and `!=` (a missing field is NULL and never matches). Timestamp
//! ordering casts the field to `timestamptz`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::store::{Direction, Document, DocumentStore, FieldOp, OrderKind, Query, StoreError};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, Json(data))| Document { id, data }))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut builder = build_select(query)?;
        debug!("document query: {}", builder.sql());

        let rows: Vec<(String, Json<Value>)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        if !data.is_object() {
            return Err(StoreError::Backend(format!(
                "document {collection}/{id} must be a JSON object"
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Accepted shape for timestamp ordering; anything else is excluded before the cast.
const RFC3339_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})$";

/// Compiles a `Query` into a parameterised SELECT. Values are always bound.
/// Field paths are validated and inlined so expression indexes on
/// `data #> '{field}'` apply.
fn build_select(query: &Query) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    builder.push_bind(query.collection.clone());

    for filter in &query.filters {
        let path = field_path(&filter.field)?;
        match filter.op {
            FieldOp::Eq => {
                builder.push(format!(" AND data #> {path} = "));
            }
            FieldOp::NotEq => {
                builder.push(format!(
                    " AND data #> {path} IS NOT NULL AND data #> {path} <> "
                ));
            }
        }
        builder.push_bind(Json(filter.value.clone()));
    }

    match &query.order_by {
        Some(order) => {
            let path = field_path(&order.field)?;
            match order.kind {
                OrderKind::Value => {
                    builder.push(format!(
                        " AND data #> {path} IS NOT NULL ORDER BY data #> {path}"
                    ));
                }
                OrderKind::Timestamp => {
                    builder.push(format!(" AND data #>> {path} ~ "));
                    builder.push_bind(RFC3339_PATTERN);
                    builder.push(format!(" ORDER BY (data #>> {path})::timestamptz"));
                }
            }
            builder.push(match order.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
        None => {
            builder.push(" ORDER BY id");
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(sql_limit(limit));
    }

    Ok(builder)
}

/// `createdAt` → `'{createdAt}'`; `a.b` → `'{a,b}'`. Segments are restricted to
/// ASCII letters, digits and underscores.
fn field_path(field: &str) -> Result<String, StoreError> {
    let valid = field.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !valid {
        return Err(StoreError::Backend(format!("invalid field path '{field}'")));
    }
    Ok(format!("'{{{}}}'", field.replace('.', ",")))
}

/// The SQL text `query` compiles to, without bound values.
#[cfg(test)]
pub(crate) fn select_sql(query: &Query) -> Result<String, StoreError> {
    Ok(build_select(query)?.sql().to_string())
}

/// Postgres LIMIT is a BIGINT; anything larger means "no limit".
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_filters_orders_by_id() {
        let builder = build_select(&Query::collection("feedback")).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY id"
        );
    }

    #[test]
    fn test_equality_filters_with_limit() {
        let query = Query::collection("feedback")
            .where_eq("interviewId", "i1")
            .where_eq("userId", "u1")
            .limit(1);
        let builder = build_select(&query).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, data FROM documents WHERE collection = $1 \
             AND data #> '{interviewId}' = $2 AND data #> '{userId}' = $3 ORDER BY id LIMIT $4"
        );
    }

    #[test]
    fn test_not_equal_requires_field_presence_and_time_order_casts() {
        let query = Query::collection("interviews")
            .where_eq("finalized", true)
            .where_ne("userId", "u1")
            .order_by_time("createdAt", Direction::Desc)
            .limit(20);
        let builder = build_select(&query).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, data FROM documents WHERE collection = $1 \
             AND data #> '{finalized}' = $2 \
             AND data #> '{userId}' IS NOT NULL AND data #> '{userId}' <> $3 \
             AND data #>> '{createdAt}' ~ $4 \
             ORDER BY (data #>> '{createdAt}')::timestamptz DESC LIMIT $5"
        );
    }

    #[test]
    fn test_value_order_drops_missing_field() {
        let query = Query::collection("interviews").order_by("meta.rank", Direction::Asc);
        let builder = build_select(&query).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT id, data FROM documents WHERE collection = $1 \
             AND data #> '{meta,rank}' IS NOT NULL ORDER BY data #> '{meta,rank}' ASC"
        );
    }

    #[test]
    fn test_field_path_rejects_injection() {
        assert_eq!(field_path("createdAt").unwrap(), "'{createdAt}'");
        assert_eq!(field_path("meta.owner").unwrap(), "'{meta,owner}'");
        assert!(field_path("userId}'; DROP TABLE documents; --").is_err());
        assert!(field_path("a..b").is_err());
        assert!(build_select(&Query::collection("x").where_eq("bad name", 1)).is_err());
    }

    #[test]
    fn test_sql_limit_saturates_instead_of_wrapping() {
        assert_eq!(sql_limit(20), 20);
        assert_eq!(sql_limit(usize::MAX), i64::MAX);
    }
}
