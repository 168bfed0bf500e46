// tests/ingest_config.rs
use scrape_normalize::ingest::config::{load_taxonomy_default, load_taxonomy_from};
use scrape_normalize::ingest::Taxonomy;
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("taxonomy.toml");
    fs::write(
        &p_toml,
        r#"
source_types = [" UNDEFINED ", "", "REGULATORY_ENFORCEMENT", "REGULATORY_ENFORCEMENT"]
importance = ["LOW", "CRITICAL"]
"#,
    )
    .unwrap();
    let t = load_taxonomy_from(&p_toml).unwrap();
    assert_eq!(
        t.source_types(),
        ["UNDEFINED".to_string(), "REGULATORY_ENFORCEMENT".to_string()]
    );
    assert!(t.is_importance("CRITICAL"));
    assert_eq!(t.default_importance(), "LOW");

    let p_json = dir.path().join("taxonomy.json");
    fs::write(&p_json, r#"{"document_types": ["NOTICE", " NEWS "]}"#).unwrap();
    let tj = load_taxonomy_from(&p_json).unwrap();
    assert_eq!(tj.default_document_type(), "NOTICE");
    assert!(tj.is_document_type("NEWS"));
    assert_eq!(tj.source_types(), Taxonomy::default().source_types());
}

#[test]
fn broken_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("taxonomy.toml");
    fs::write(&p, "source_types = [").unwrap();
    assert!(load_taxonomy_from(&p).is_err());
    assert!(load_taxonomy_from(&dir.path().join("missing.toml")).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // isolate CWD so the repo's own config/ is not read
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var("INGEST_TAXONOMY_PATH");

    // 1) nothing → built-ins
    assert_eq!(load_taxonomy_default().unwrap(), Taxonomy::default());

    // 2) TOML fallback in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("taxonomy.toml"), r#"importance = ["LOW", "HIGH"]"#).unwrap();
    let t = load_taxonomy_default().unwrap();
    assert_eq!(t.importance(), ["LOW".to_string(), "HIGH".to_string()]);

    // 3) env has priority
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"source_types": ["X"]}"#).unwrap();
    env::set_var("INGEST_TAXONOMY_PATH", p_env.display().to_string());
    assert_eq!(load_taxonomy_default().unwrap().default_source_type(), "X");

    // 4) env pointing nowhere is an error, not a silent fallback
    env::set_var("INGEST_TAXONOMY_PATH", tmp.path().join("nope.toml"));
    assert!(load_taxonomy_default().is_err());
    env::remove_var("INGEST_TAXONOMY_PATH");

    env::set_current_dir(&old).unwrap();
}
