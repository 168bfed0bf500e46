// src/ingest/convert.rs
use serde_json::Value;

use crate::ingest::types::{RawRecord, StorageDocument, TaskMetadata};

/// Stamp a record for storage: copy every key, then set `id`, `url`,
/// `version` and `crawled` (the last two both `timestamp`).
///
/// No validation happens here; run [`validate`](crate::ingest::validate)
/// first if the record should be canonical.
pub fn convert(task: &TaskMetadata, record: &RawRecord, timestamp: f64) -> StorageDocument {
    let mut doc = record.clone();
    doc.insert("id".into(), Value::String(task.taskid.clone()));
    doc.insert("url".into(), Value::String(task.url.clone()));
    // non-finite floats have no JSON form; they end up as null
    doc.insert("version".into(), Value::from(timestamp));
    doc.insert("crawled".into(), Value::from(timestamp));
    StorageDocument(doc)
}
