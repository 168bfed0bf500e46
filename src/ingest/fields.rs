// src/ingest/fields.rs
//! One validator per canonical field.
//!
//! Identity and content fields (`body`, `name`, `short_name`, `lang_code`,
//! `jurisdiction`) fail hard. Categorical metadata (`source_type`,
//! `document_type`, `importance`), `title` and `published` degrade to a default and
//! only leave a debug event plus a fallback counter behind.

use chrono::{DateTime, Utc};
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ingest::dates::parse_date_at;
use crate::ingest::error::ValidationError;
use crate::ingest::resolve::{lookup, resolve};
use crate::ingest::taxonomy::Taxonomy;
use crate::ingest::types::RawRecord;

pub const NAME_KEYS: &[&str] = &["institution_name", "name"];
pub const SHORT_NAME_KEYS: &[&str] = &["short_institution_name", "short_name", "short"];
pub const LANG_KEYS: &[&str] = &["expected_language_code", "lang_code", "lang", "language"];
pub const JURISDICTION_KEYS: &[&str] = &["jurisdiction", "country"];
pub const STATE_KEYS: &[&str] = &["jurisdiction_state", "state"];
pub const MUNICIPALITY_KEYS: &[&str] = &["jurisdiction_municipality", "municipality", "town"];

// Prefix matches on purpose: "en_GB" and "USA" pass.
static LANG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z]").expect("lang regex"));
static LOCALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z]-[A-Z][A-Z]").expect("locale regex"));
static JURISDICTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z]").expect("jurisdiction regex"));

fn note_fallback(field: &'static str, reason: &'static str) {
    tracing::debug!(target: "ingest", field, reason, "falling back to default");
    counter!("ingest_fallback_total", "field" => field).increment(1);
}

fn text<'a>(v: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    v.as_str().ok_or(ValidationError::invalid_type(field))
}

fn required_trimmed(
    rec: &RawRecord,
    keys: &[&str],
    field: &'static str,
) -> Result<String, ValidationError> {
    let v = resolve(rec, keys).ok_or(ValidationError::missing(field))?;
    let s = text(v, field)?.trim();
    if s.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(s.to_string())
}

fn optional_trimmed(rec: &RawRecord, keys: &[&str]) -> Option<String> {
    resolve(rec, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Unix seconds. Absent or unparseable strings fall back to `now`; numbers
/// must be strictly positive; any other JSON type is rejected.
pub fn published(rec: &RawRecord, now: DateTime<Utc>) -> Result<f64, ValidationError> {
    let now_secs = now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9;
    match lookup(rec, "published") {
        None => {
            note_fallback("published", "missing");
            Ok(now_secs)
        }
        Some(Value::String(s)) => match parse_date_at(s, now) {
            Some(ts) => Ok(ts),
            None => {
                note_fallback("published", "unparseable");
                Ok(now_secs)
            }
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(ts) if ts > 0.0 => Ok(ts),
            _ => Err(ValidationError::invalid_type("published")),
        },
        Some(_) => Err(ValidationError::invalid_type("published")),
    }
}

/// Never fails: absent or non-string titles become `""`.
pub fn title(rec: &RawRecord) -> String {
    match resolve(rec, &["title"]).map(Value::as_str) {
        Some(Some(s)) => s.trim().to_string(),
        Some(None) => {
            note_fallback("title", "not_a_string");
            String::new()
        }
        None => {
            note_fallback("title", "missing");
            String::new()
        }
    }
}

pub fn body(rec: &RawRecord) -> Result<String, ValidationError> {
    let v = lookup(rec, "body").ok_or(ValidationError::missing("body"))?;
    let b = text(v, "body")?.trim();
    if b.is_empty() {
        return Err(ValidationError::empty("body"));
    }
    Ok(b.to_string())
}

pub fn name(rec: &RawRecord) -> Result<String, ValidationError> {
    required_trimmed(rec, NAME_KEYS, "name")
}

pub fn short_name(rec: &RawRecord) -> Result<String, ValidationError> {
    required_trimmed(rec, SHORT_NAME_KEYS, "short_name")
}

fn categorical(
    rec: &RawRecord,
    field: &'static str,
    is_member: impl Fn(&str) -> bool,
    default: &str,
) -> String {
    match lookup(rec, field) {
        Some(Value::String(s)) if is_member(s.as_str()) => s.clone(),
        Some(_) => {
            note_fallback(field, "not_in_taxonomy");
            default.to_string()
        }
        None => {
            note_fallback(field, "missing");
            default.to_string()
        }
    }
}

pub fn source_type(rec: &RawRecord, tax: &Taxonomy) -> String {
    categorical(
        rec,
        "source_type",
        |s| tax.is_source_type(s),
        tax.default_source_type(),
    )
}

pub fn document_type(rec: &RawRecord, tax: &Taxonomy) -> String {
    categorical(
        rec,
        "document_type",
        |s| tax.is_document_type(s),
        tax.default_document_type(),
    )
}

pub fn importance(rec: &RawRecord, tax: &Taxonomy) -> String {
    categorical(
        rec,
        "importance",
        |s| tax.is_importance(s),
        tax.default_importance(),
    )
}

/// `en` or `en-US`; not trimmed, not case-folded.
pub fn lang_code(rec: &RawRecord) -> Result<String, ValidationError> {
    let v = resolve(rec, LANG_KEYS).ok_or(ValidationError::missing("lang_code"))?;
    let lang = text(v, "lang_code")?;
    if LANG_RE.is_match(lang) || LOCALE_RE.is_match(lang) {
        Ok(lang.to_string())
    } else {
        Err(ValidationError::format("lang_code"))
    }
}

/// Two leading uppercase letters; not checked against an ISO 3166 list.
pub fn jurisdiction(rec: &RawRecord) -> Result<String, ValidationError> {
    let v = resolve(rec, JURISDICTION_KEYS).ok_or(ValidationError::missing("jurisdiction"))?;
    let jur = text(v, "jurisdiction")?.trim();
    if jur.is_empty() {
        return Err(ValidationError::empty("jurisdiction"));
    }
    if !JURISDICTION_RE.is_match(jur) {
        return Err(ValidationError::format("jurisdiction"));
    }
    Ok(jur.to_string())
}

pub fn jurisdiction_state(rec: &RawRecord) -> Option<String> {
    optional_trimmed(rec, STATE_KEYS)
}

pub fn jurisdiction_municipality(rec: &RawRecord) -> Option<String> {
    optional_trimmed(rec, MUNICIPALITY_KEYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::error::ErrorKind;
    use chrono::TimeZone;
    use serde_json::json;

    fn rec(v: Value) -> RawRecord {
        v.as_object().cloned().expect("fixture must be an object")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn published_branches() {
        let now_secs = now().timestamp() as f64;
        assert_eq!(published(&rec(json!({})), now()), Ok(now_secs));
        assert_eq!(published(&rec(json!({"published": null})), now()), Ok(now_secs));
        assert_eq!(
            published(&rec(json!({"published": "gibberish"})), now()),
            Ok(now_secs)
        );
        assert_eq!(
            published(&rec(json!({"published": "2023-01-05"})), now()),
            Ok(1_672_876_800.0)
        );
        assert_eq!(published(&rec(json!({"published": 5.0})), now()), Ok(5.0));
        assert_eq!(published(&rec(json!({"published": 7})), now()), Ok(7.0));
        for bad in [json!(0.0), json!(-5.0), json!(true), json!([1.0])] {
            let err = published(&rec(json!({ "published": bad })), now()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidType);
        }
    }

    #[test]
    fn names_resolve_aliases_and_trim() {
        let r = rec(json!({"name": "Other", "institution_name": "  Securities Board "}));
        assert_eq!(name(&r).unwrap(), "Securities Board");
        let r = rec(json!({"short": "sb", "short_name": ""}));
        assert_eq!(short_name(&r).unwrap(), "sb");
        let r = rec(json!({"name": "   "}));
        assert_eq!(name(&r), Err(ValidationError::missing("name")));
        let r = rec(json!({"name": 42}));
        assert_eq!(name(&r), Err(ValidationError::invalid_type("name")));
    }

    #[test]
    fn title_defaults_to_empty() {
        assert_eq!(title(&rec(json!({}))), "");
        assert_eq!(title(&rec(json!({"title": "  Fine issued "}))), "Fine issued");
        assert_eq!(title(&rec(json!({"title": 5}))), "");
        assert_eq!(title(&rec(json!({"title": ["a"]}))), "");
    }

    #[test]
    fn body_distinguishes_missing_from_blank() {
        assert_eq!(body(&rec(json!({}))), Err(ValidationError::missing("body")));
        assert_eq!(
            body(&rec(json!({"body": ""}))),
            Err(ValidationError::empty("body"))
        );
        assert_eq!(
            body(&rec(json!({"body": " \n\t"}))),
            Err(ValidationError::empty("body"))
        );
        assert_eq!(body(&rec(json!({"body": " text "}))).unwrap(), "text");
    }

    #[test]
    fn categorical_fields_fall_back_silently() {
        let tax = Taxonomy::default();
        let r = rec(json!({"source_type": "NOT_A_TYPE", "document_type": "NEWS", "importance": 3}));
        assert_eq!(source_type(&r, &tax), "UNDEFINED");
        assert_eq!(document_type(&r, &tax), "NEWS");
        assert_eq!(importance(&r, &tax), "LOW");
        let r = rec(json!({"importance": "HIGH"}));
        assert_eq!(importance(&r, &tax), "HIGH");
        assert_eq!(document_type(&r, &tax), "UNKNOWN");
    }

    #[test]
    fn lang_code_prefix_patterns() {
        for ok in ["en", "en-US", "english", "en_GB"] {
            assert_eq!(lang_code(&rec(json!({ "lang": ok }))).unwrap(), ok);
        }
        for bad in ["EN", "e", "1en", " en"] {
            assert_eq!(
                lang_code(&rec(json!({ "lang": bad }))),
                Err(ValidationError::format("lang_code"))
            );
        }
        let r = rec(json!({"language": "de", "expected_language_code": "fr"}));
        assert_eq!(lang_code(&r).unwrap(), "fr");
        assert_eq!(
            lang_code(&rec(json!({}))),
            Err(ValidationError::missing("lang_code"))
        );
    }

    #[test]
    fn jurisdiction_rules() {
        assert_eq!(jurisdiction(&rec(json!({"country": " DE "}))).unwrap(), "DE");
        assert_eq!(jurisdiction(&rec(json!({"jurisdiction": "USA"}))).unwrap(), "USA");
        assert_eq!(
            jurisdiction(&rec(json!({"jurisdiction": "us"}))),
            Err(ValidationError::format("jurisdiction"))
        );
        assert_eq!(
            jurisdiction(&rec(json!({"jurisdiction": "   "}))),
            Err(ValidationError::empty("jurisdiction"))
        );
        assert_eq!(
            jurisdiction(&rec(json!({"jurisdiction": ""}))),
            Err(ValidationError::missing("jurisdiction"))
        );
    }

    #[test]
    fn optional_locations_never_fail() {
        let r = rec(json!({"state": " Bavaria ", "town": "  ", "municipality": 12}));
        assert_eq!(jurisdiction_state(&r).as_deref(), Some("Bavaria"));
        assert_eq!(jurisdiction_municipality(&r), None);
        assert_eq!(jurisdiction_state(&rec(json!({}))), None);
    }
}
