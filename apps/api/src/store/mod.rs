//! Document store: the single seam between the service and its database.
//!
//! Collections hold schema-less JSON documents keyed by a string id. Callers
//! never touch a backend directly; they receive a `&dyn DocumentStore` and
//! go through `record::decode` to get typed, validated records back.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgres;
pub mod record;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document {collection}/{id} violates schema: {reason}")]
    Schema {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A raw document as held by the store. `data` never contains the id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Eq,
    /// Firestore semantics: documents without the field never match.
    NotEq,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FieldOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// How ordered values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    /// Raw JSON value order.
    Value,
    /// RFC 3339 strings compared as instants, whatever their precision or
    /// offset. Documents whose field does not parse are dropped.
    Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
    pub kind: OrderKind,
}

/// A query against one collection: all filters AND-ed, then ordered, then limited.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FieldOp::Eq,
            value: value.into(),
        });
        self
    }

    pub fn where_ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FieldOp::NotEq,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
            kind: OrderKind::Value,
        });
        self
    }

    pub fn order_by_time(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
            kind: OrderKind::Timestamp,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Backend-agnostic access to the document database.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Creates or fully replaces the document at `collection/id`.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;
}

/// Outcome of a single-record read.
///
/// Keeps "the record does not exist" apart from "the store could not answer",
/// so callers pick their own fallback for each.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable(StoreError),
}
