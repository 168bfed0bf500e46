// tests/ingest_global_taxonomy.rs
//
// Own test binary: installing the process-wide taxonomy is a one-shot action.

use serde_json::json;

use scrape_normalize::ingest::{taxonomy, validate, Taxonomy};

#[test]
fn installed_taxonomy_drives_free_validate() {
    let tax = Taxonomy::new(
        vec!["NONE".into(), "COURT".into()],
        vec!["OTHER".into()],
        vec!["LOW".into(), "HIGH".into()],
        "LOW",
    )
    .unwrap();
    taxonomy::install(tax).unwrap();

    // second install is refused
    assert!(taxonomy::install(Taxonomy::default()).is_err());

    let r = json!({
        "body": "b", "name": "N", "short_name": "n", "lang": "en", "jurisdiction": "US",
        "source_type": "COURT", "document_type": "NEWS"
    });
    let doc = validate(r.as_object().unwrap()).unwrap();
    assert_eq!(doc.source_type, "COURT");
    assert_eq!(doc.document_type, "OTHER");
    assert_eq!(taxonomy::global().default_source_type(), "NONE");
}
