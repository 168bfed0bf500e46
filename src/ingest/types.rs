// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely structured record as emitted by a scraper.
pub type RawRecord = Map<String, Value>;

/// Normalized, schema-conformant document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalDocument {
    pub published: f64, // unix seconds
    pub title: String,
    pub body: String,
    pub name: String,
    pub short_name: String,
    pub source_type: String,
    pub document_type: String,
    pub lang_code: String,
    pub jurisdiction: String,
    pub jurisdiction_state: Option<String>,
    pub jurisdiction_municipality: Option<String>,
    pub importance: String,
}

impl CanonicalDocument {
    /// Flatten back into a record (all twelve keys, `None` as null) so it can
    /// be stamped by [`convert`](crate::ingest::convert::convert).
    pub fn into_record(self) -> RawRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct of strings/floats always serializes to an object;
            // a NaN `published` would serialize as null, never fail.
            _ => RawRecord::new(),
        }
    }
}

/// Identity of the crawl task that produced a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskMetadata {
    pub taskid: String,
    pub url: String,
}

impl TaskMetadata {
    pub fn new(taskid: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            taskid: taskid.into(),
            url: url.into(),
        }
    }
}

/// Record fields plus the `id`/`url`/`version`/`crawled` stamp.
///
/// Only constructed by [`convert`](crate::ingest::convert::convert), which
/// guarantees the four stamped keys are present.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct StorageDocument(pub(crate) Map<String, Value>);

impl StorageDocument {
    pub fn id(&self) -> &str {
        self.0.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn url(&self) -> &str {
        self.0.get("url").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn version(&self) -> f64 {
        self.0.get("version").and_then(Value::as_f64).unwrap_or_default()
    }

    pub fn crawled(&self) -> f64 {
        self.0.get("crawled").and_then(Value::as_f64).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
