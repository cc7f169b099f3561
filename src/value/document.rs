//! Documents returned by the store

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::doc_value::DocValue;

/// A stored document: an id and its field mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID within its collection
    pub id: String,
    /// Field values
    #[serde(default)]
    pub fields: BTreeMap<String, DocValue>,
}

impl Document {
    /// Creates an empty document
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, builder style
    pub fn with(mut self, field: impl Into<String>, value: impl Into<DocValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Builds a document from a JSON object.
    ///
    /// The `id` key, if present and a string, becomes the document ID and
    /// is not kept as a field. Returns None for non-objects.
    pub fn from_json(fallback_id: impl Into<String>, value: Value) -> Option<Self> {
        let Value::Object(obj) = value else {
            return None;
        };

        let mut id = fallback_id.into();
        let mut fields = BTreeMap::new();
        for (key, v) in obj {
            if key == "id" {
                if let Value::String(s) = &v {
                    id = s.clone();
                    continue;
                }
            }
            fields.insert(key, DocValue::from(v));
        }

        Some(Self { id, fields })
    }

    /// Looks up a field. Dotted paths descend into nested maps.
    pub fn get(&self, path: &str) -> Option<&DocValue> {
        if let Some(value) = self.fields.get(path) {
            return Some(value);
        }

        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.fields.get(first)?;
        for part in parts {
            current = current.as_map()?.get(part)?;
        }
        Some(current)
    }

    /// Returns the document as `{"id": .., "data": {..}}`
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "data": Value::Object(
                self.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect()
            ),
        })
    }
}
