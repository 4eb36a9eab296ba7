//! Serde helpers for document timestamps.
//!
//! Timestamps are written as RFC 3339 UTC strings with a fixed nanosecond
//! fraction, so string order in the store equals chronological order.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn format(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(at))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

/// Descending order: whole seconds first, sub-second nanos as the tie-break.
pub fn newest_first(a: &DateTime<Utc>, b: &DateTime<Utc>) -> Ordering {
    b.timestamp()
        .cmp(&a.timestamp())
        .then_with(|| b.timestamp_subsec_nanos().cmp(&a.timestamp_subsec_nanos()))
}
