//! Field values stored in documents
//!
//! Mirrors the store's value model: one numeric type, strings, booleans,
//! null, timestamps, arrays and nested maps.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// JSON key marking a timestamp value on the wire
pub const TIMESTAMP_KEY: &str = "$timestamp";

/// A single field value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<DocValue>),
    Map(BTreeMap<String, DocValue>),
}

impl DocValue {
    /// Runtime type name used in validation errors
    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "boolean",
            DocValue::Number(_) => "number",
            DocValue::String(_) => "string",
            DocValue::Timestamp(_) => "timestamp",
            DocValue::Array(_) => "array",
            DocValue::Map(_) => "map",
        }
    }

    /// Converts timestamps to epoch milliseconds, descending into arrays.
    ///
    /// Maps are returned as-is.
    pub fn to_primitives(&self) -> DocValue {
        match self {
            DocValue::Timestamp(ts) => DocValue::Number(ts.timestamp_millis() as f64),
            DocValue::Array(items) => {
                DocValue::Array(items.iter().map(DocValue::to_primitives).collect())
            }
            other => other.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, DocValue>> {
        match self {
            DocValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Converts to plain JSON. Timestamps become `{"$timestamp": "<RFC 3339>"}`.
    pub fn to_json(&self) -> Value {
        match self {
            DocValue::Null => Value::Null,
            DocValue::Bool(b) => Value::Bool(*b),
            DocValue::Number(n) => number_to_json(*n),
            DocValue::String(s) => Value::String(s.clone()),
            DocValue::Timestamp(ts) => {
                let mut obj = serde_json::Map::new();
                obj.insert(TIMESTAMP_KEY.to_string(), Value::String(format_timestamp(ts)));
                Value::Object(obj)
            }
            DocValue::Array(items) => Value::Array(items.iter().map(DocValue::to_json).collect()),
            DocValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Integral values are emitted as JSON integers so `30` round-trips as `30`, not `30.0`
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Reads `{"$timestamp": ...}` as either an RFC 3339 string or epoch millis
fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocValue::Null,
            Value::Bool(b) => DocValue::Bool(b),
            Value::Number(n) => DocValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => DocValue::String(s),
            Value::Array(items) => DocValue::Array(items.into_iter().map(DocValue::from).collect()),
            Value::Object(obj) => {
                if obj.len() == 1 {
                    if let Some(ts) = obj.get(TIMESTAMP_KEY).and_then(parse_timestamp) {
                        return DocValue::Timestamp(ts);
                    }
                }
                DocValue::Map(obj.into_iter().map(|(k, v)| (k, DocValue::from(v))).collect())
            }
        }
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocValue::Null => serializer.serialize_unit(),
            DocValue::Bool(b) => serializer.serialize_bool(*b),
            DocValue::Number(n) => number_to_json(*n).serialize(serializer),
            DocValue::String(s) => serializer.serialize_str(s),
            DocValue::Timestamp(ts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(TIMESTAMP_KEY, &format_timestamp(ts))?;
                map.end()
            }
            DocValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocValue::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DocValue::from)
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        DocValue::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        DocValue::String(s)
    }
}

impl From<f64> for DocValue {
    fn from(n: f64) -> Self {
        DocValue::Number(n)
    }
}

impl From<i64> for DocValue {
    fn from(n: i64) -> Self {
        DocValue::Number(n as f64)
    }
}

impl From<i32> for DocValue {
    fn from(n: i32) -> Self {
        DocValue::Number(n as f64)
    }
}

impl From<u32> for DocValue {
    fn from(n: u32) -> Self {
        DocValue::Number(n as f64)
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        DocValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for DocValue {
    fn from(ts: DateTime<Utc>) -> Self {
        DocValue::Timestamp(ts)
    }
}

impl<T: Into<DocValue>> From<Vec<T>> for DocValue {
    fn from(items: Vec<T>) -> Self {
        DocValue::Array(items.into_iter().map(Into::into).collect())
    }
}
