//! Typed records at the store boundary.
//!
//! Every document read from the store passes through `decode`: the document id
//! is merged into the payload, the payload is deserialized into the record type,
//! and the record's own `validate` runs. Anything that fails is a
//! `StoreError::Schema` naming the offending document.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::store::{Document, StoreError};

pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Invariants serde cannot express. Returns a human-readable reason on failure.
    fn validate(&self) -> Result<(), String>;
}

pub fn decode<R: Record>(document: Document) -> Result<R, StoreError> {
    let Document { id, data } = document;

    let mut object = match data {
        Value::Object(map) => map,
        other => {
            return Err(schema_error::<R>(
                &id,
                format!("expected a JSON object, found {}", json_kind(&other)),
            ))
        }
    };
    // The store id always wins over any stray `id` field in the payload.
    object.insert("id".to_string(), Value::String(id.clone()));

    let record: R = serde_json::from_value(Value::Object(object))
        .map_err(|e| schema_error::<R>(&id, e.to_string()))?;
    record
        .validate()
        .map_err(|reason| schema_error::<R>(&id, reason))?;

    Ok(record)
}

/// Decodes a query result, logging and skipping documents that fail validation.
pub fn decode_valid<R: Record>(documents: Vec<Document>) -> Vec<R> {
    documents
        .into_iter()
        .filter_map(|document| match decode::<R>(document) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping invalid document: {e}");
                None
            }
        })
        .collect()
}

/// Serializes a record for `DocumentStore::set`, dropping the id (it is the key).
pub fn encode<R: Record>(record: &R) -> Result<Value, StoreError> {
    record
        .validate()
        .map_err(|reason| schema_error::<R>(record.id(), reason))?;

    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}

fn schema_error<R: Record>(id: &str, reason: String) -> StoreError {
    StoreError::Schema {
        collection: R::COLLECTION.to_string(),
        id: id.to_string(),
        reason,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
