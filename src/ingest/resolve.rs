// src/ingest/resolve.rs
use serde_json::Value;

use crate::ingest::types::RawRecord;

/// Loose truthiness over JSON values: null, `false`, zero, `""`, `[]` and `{}`
/// count as absent.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First truthy value among `keys`, checked strictly in order.
pub fn resolve<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| is_truthy(v))
}

/// Single-key lookup that keeps empty values but treats null as absent.
pub fn lookup<'a>(record: &'a RawRecord, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}
