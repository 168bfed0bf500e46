// src/ingest/taxonomy.rs
//! Bounded vocabularies for the categorical fields of a canonical document.
//!
//! The first entry of each list is the fallback used when a record carries a
//! missing or unknown value. Importance falls back to `importance_default`
//! instead, which must itself be a member.
//!
//! A process installs its taxonomy once at startup via [`install`]; code that
//! needs an alternate vocabulary (tests, tooling) builds a
//! [`RecordValidator`](crate::ingest::validator::RecordValidator) with its own
//! [`Taxonomy`] instead of touching the global.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;

pub const DEFAULT_SOURCE_TYPES: &[&str] = &[
    "UNDEFINED",
    "REGULATORY_ENFORCEMENT",
    "LAW_ENFORCEMENT",
    "JUDICIARY_COURT_RECORDS",
    "NONGOV_ORG",
];

pub const DEFAULT_DOCUMENT_TYPES: &[&str] = &[
    "UNKNOWN",
    "NEWS",
    "PRESS_RELEASE",
    "COMMENT",
    "ALERT",
    "LITIGATION",
    "OTHER",
];

pub const DEFAULT_IMPORTANCE: &[&str] = &["LOW", "MEDIUM", "HIGH"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    source_types: Vec<String>,
    document_types: Vec<String>,
    importance: Vec<String>,
    importance_default: String,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            source_types: owned(DEFAULT_SOURCE_TYPES),
            document_types: owned(DEFAULT_DOCUMENT_TYPES),
            importance: owned(DEFAULT_IMPORTANCE),
            importance_default: "LOW".to_string(),
        }
    }
}

impl Taxonomy {
    /// Build a taxonomy, checking every list is non-empty and the importance
    /// default is a member of the importance list.
    pub fn new(
        source_types: Vec<String>,
        document_types: Vec<String>,
        importance: Vec<String>,
        importance_default: impl Into<String>,
    ) -> Result<Self> {
        let importance_default = importance_default.into();
        for (name, list) in [
            ("source_types", &source_types),
            ("document_types", &document_types),
            ("importance", &importance),
        ] {
            if list.is_empty() {
                return Err(anyhow!("taxonomy list `{name}` must not be empty"));
            }
        }
        if !importance.contains(&importance_default) {
            return Err(anyhow!(
                "importance_default `{importance_default}` is not an importance level"
            ));
        }
        Ok(Self {
            source_types,
            document_types,
            importance,
            importance_default,
        })
    }

    pub fn source_types(&self) -> &[String] {
        &self.source_types
    }

    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }

    pub fn importance(&self) -> &[String] {
        &self.importance
    }

    pub fn default_source_type(&self) -> &str {
        &self.source_types[0]
    }

    pub fn default_document_type(&self) -> &str {
        &self.document_types[0]
    }

    pub fn default_importance(&self) -> &str {
        &self.importance_default
    }

    pub fn is_source_type(&self, s: &str) -> bool {
        self.source_types.iter().any(|t| t == s)
    }

    pub fn is_document_type(&self, s: &str) -> bool {
        self.document_types.iter().any(|t| t == s)
    }

    pub fn is_importance(&self, s: &str) -> bool {
        self.importance.iter().any(|t| t == s)
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

static GLOBAL: OnceCell<Taxonomy> = OnceCell::new();

/// Install the process-wide taxonomy. Only the first call wins; a later call
/// (or a call after [`global`] already fell back to the defaults) errors.
pub fn install(taxonomy: Taxonomy) -> Result<()> {
    GLOBAL
        .set(taxonomy)
        .map_err(|_| anyhow!("taxonomy already installed for this process"))
}

/// Process-wide taxonomy; the built-in defaults unless [`install`] ran first.
pub fn global() -> &'static Taxonomy {
    GLOBAL.get_or_init(Taxonomy::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_entries() {
        let t = Taxonomy::default();
        assert_eq!(t.default_source_type(), "UNDEFINED");
        assert_eq!(t.default_document_type(), "UNKNOWN");
        assert_eq!(t.default_importance(), "LOW");
        assert!(t.is_document_type("PRESS_RELEASE"));
        assert!(!t.is_source_type("undefined"));
    }

    #[test]
    fn rejects_empty_lists_and_foreign_default() {
        let err = Taxonomy::new(vec![], owned(&["X"]), owned(&["LOW"]), "LOW").unwrap_err();
        assert!(err.to_string().contains("source_types"));

        let err = Taxonomy::new(owned(&["A"]), owned(&["B"]), owned(&["LOW"]), "HIGH").unwrap_err();
        assert!(err.to_string().contains("importance_default"));
    }

    #[test]
    fn global_falls_back_to_defaults() {
        assert!(global().is_importance("HIGH"));
    }
}
