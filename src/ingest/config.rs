// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::taxonomy::{
    Taxonomy, DEFAULT_DOCUMENT_TYPES, DEFAULT_IMPORTANCE, DEFAULT_SOURCE_TYPES,
};

pub const ENV_TAXONOMY_PATH: &str = "INGEST_TAXONOMY_PATH";

/// On-disk shape. Every section is optional; omitted ones keep the built-in
/// list.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    source_types: Option<Vec<String>>,
    document_types: Option<Vec<String>>,
    importance: Option<Vec<String>>,
    importance_default: Option<String>,
}

/// Load a taxonomy from an explicit path. Supports TOML or JSON formats.
pub fn load_taxonomy_from(path: &Path) -> Result<Taxonomy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading taxonomy from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_taxonomy(&content, ext.as_str())
        .with_context(|| format!("parsing taxonomy {}", path.display()))
}

/// Load the taxonomy using env var + fallbacks:
/// 1) $INGEST_TAXONOMY_PATH
/// 2) config/taxonomy.toml
/// 3) config/taxonomy.json
/// 4) built-in defaults
pub fn load_taxonomy_default() -> Result<Taxonomy> {
    if let Ok(p) = std::env::var(ENV_TAXONOMY_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_taxonomy_from(&pb);
        } else {
            return Err(anyhow!("INGEST_TAXONOMY_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/taxonomy.toml");
    if toml_p.exists() {
        return load_taxonomy_from(&toml_p);
    }
    let json_p = PathBuf::from("config/taxonomy.json");
    if json_p.exists() {
        return load_taxonomy_from(&json_p);
    }
    Ok(Taxonomy::default())
}

fn parse_taxonomy(s: &str, hint_ext: &str) -> Result<Taxonomy> {
    let looks_json = s.trim_start().starts_with('{');
    let file = if hint_ext == "json" || (hint_ext != "toml" && looks_json) {
        serde_json::from_str::<TaxonomyFile>(s).context("invalid taxonomy JSON")?
    } else {
        toml::from_str::<TaxonomyFile>(s).context("invalid taxonomy TOML")?
    };
    build(file)
}

fn build(file: TaxonomyFile) -> Result<Taxonomy> {
    let source_types = section("source_types", file.source_types, DEFAULT_SOURCE_TYPES)?;
    let document_types = section("document_types", file.document_types, DEFAULT_DOCUMENT_TYPES)?;
    let importance = section("importance", file.importance, DEFAULT_IMPORTANCE)?;

    // "LOW" stays the default while it is still a level; otherwise the first level.
    let importance_default = match file.importance_default {
        Some(d) => d.trim().to_string(),
        None if importance.iter().any(|l| l == "LOW") => "LOW".to_string(),
        None => importance[0].clone(),
    };
    Taxonomy::new(source_types, document_types, importance, importance_default)
}

fn section(name: &str, items: Option<Vec<String>>, builtin: &[&str]) -> Result<Vec<String>> {
    match items {
        None => Ok(builtin.iter().map(|s| s.to_string()).collect()),
        Some(items) => {
            let cleaned = clean_list(items);
            if cleaned.is_empty() {
                return Err(anyhow!("taxonomy section `{name}` has no entries"));
            }
            Ok(cleaned)
        }
    }
}

/// Trim, drop blanks, drop duplicates. Keeps first-seen order because the
/// first entry doubles as the fallback value.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}
