// src/lib.rs
// Public library surface for the line filter binary and integration tests.

pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::ingest::{
    convert, validate, CanonicalDocument, ErrorKind, RawRecord, RecordValidator,
    StorageDocument, TaskMetadata, Taxonomy, ValidationError,
};
