// src/ingest/mod.rs
pub mod config;
pub mod convert;
pub mod dates;
pub mod error;
pub mod fields;
pub mod resolve;
pub mod taxonomy;
pub mod types;
pub mod validator;

pub use convert::convert;
pub use dates::parse_date;
pub use error::{ErrorKind, ValidationError};
pub use resolve::resolve;
pub use taxonomy::Taxonomy;
pub use types::{CanonicalDocument, RawRecord, StorageDocument, TaskMetadata};
pub use validator::{validate, RecordValidator};

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once a recorder exists).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_validated_total",
            "Records that passed validation."
        );
        describe_counter!(
            "ingest_rejected_total",
            "Records rejected by validation, by field and error kind."
        );
        describe_counter!(
            "ingest_fallback_total",
            "Fields that fell back to a default value."
        );
    });
}

/// Validate one record, then stamp the canonical document for storage.
pub fn process(
    validator: &RecordValidator<'_>,
    task: &TaskMetadata,
    raw: &RawRecord,
    timestamp: f64,
) -> Result<StorageDocument, ValidationError> {
    ensure_metrics_described();
    match validator.validate(raw) {
        Ok(doc) => {
            counter!("ingest_validated_total").increment(1);
            Ok(convert(task, &doc.into_record(), timestamp))
        }
        Err(e) => {
            counter!(
                "ingest_rejected_total",
                "field" => e.field,
                "kind" => e.kind.as_str()
            )
            .increment(1);
            Err(e)
        }
    }
}

/// A record that failed validation, with the task that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub taskid: String,
    pub error: ValidationError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub stored: Vec<StorageDocument>,
    pub rejected: Vec<Rejected>,
}

/// Run [`process`] over independent records. A rejected record never stops
/// the rest of the batch.
pub fn process_batch<I>(validator: &RecordValidator<'_>, items: I, timestamp: f64) -> BatchReport
where
    I: IntoIterator<Item = (TaskMetadata, RawRecord)>,
{
    let mut report = BatchReport::default();
    for (task, raw) in items {
        match process(validator, &task, &raw, timestamp) {
            Ok(doc) => report.stored.push(doc),
            Err(error) => {
                tracing::debug!(target: "ingest", taskid = %task.taskid, %error, "record rejected");
                report.rejected.push(Rejected {
                    taskid: task.taskid,
                    error,
                });
            }
        }
    }
    report
}
