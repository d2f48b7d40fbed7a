//! Records and payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat field map sent on create/update. Never carries `id`.
pub type Payload = BTreeMap<String, String>;

/// A stored record. Domain fields sit beside `id` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Server-assigned identifier, immutable after creation
    pub id: String,
    /// Domain fields
    #[serde(flatten)]
    pub fields: Payload,
}

impl Record {
    /// Build a record from an id and its fields. A stray `id` key in the
    /// payload is dropped.
    pub fn new(id: impl Into<String>, mut fields: Payload) -> Self {
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Field value, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value or the empty string
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Overlay `payload` on this record. `id` is never overwritten.
    pub fn merge(&mut self, payload: &Payload) {
        for (key, value) in payload {
            if key != "id" {
                self.fields.insert(key.clone(), value.clone());
            }
        }
    }
}
