// src/ingest/validator.rs
use chrono::{DateTime, Utc};

use crate::ingest::error::ValidationError;
use crate::ingest::fields;
use crate::ingest::taxonomy::{self, Taxonomy};
use crate::ingest::types::{CanonicalDocument, RawRecord};

/// Runs every field validator against one record.
///
/// Order is fixed and the first failure aborts: `published`, `title`,
/// `body`, `name`, `short_name`, `source_type`, `document_type`,
/// `lang_code`, `jurisdiction`, `jurisdiction_state`,
/// `jurisdiction_municipality`, `importance`.
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator<'a> {
    taxonomy: &'a Taxonomy,
    now: Option<DateTime<Utc>>,
}

impl Default for RecordValidator<'static> {
    fn default() -> Self {
        Self::new(taxonomy::global())
    }
}

impl<'a> RecordValidator<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            now: None,
        }
    }

    /// Pin the clock used for `published` fallbacks and partial dates.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn validate(&self, raw: &RawRecord) -> Result<CanonicalDocument, ValidationError> {
        let tax = self.taxonomy;
        let now = self.now.unwrap_or_else(Utc::now);

        Ok(CanonicalDocument {
            published: fields::published(raw, now)?,
            title: fields::title(raw),
            body: fields::body(raw)?,
            name: fields::name(raw)?,
            short_name: fields::short_name(raw)?,
            source_type: fields::source_type(raw, tax),
            document_type: fields::document_type(raw, tax),
            lang_code: fields::lang_code(raw)?,
            jurisdiction: fields::jurisdiction(raw)?,
            jurisdiction_state: fields::jurisdiction_state(raw),
            jurisdiction_municipality: fields::jurisdiction_municipality(raw),
            importance: fields::importance(raw, tax),
        })
    }
}

/// Validate against the process-wide taxonomy and the system clock.
pub fn validate(raw: &RawRecord) -> Result<CanonicalDocument, ValidationError> {
    RecordValidator::default().validate(raw)
}
