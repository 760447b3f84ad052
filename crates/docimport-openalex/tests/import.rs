//! End-to-end import over temp staging files and a temp store

use std::io::Write;
use std::path::Path;

use docimport_core::ProgressContext;
use docimport_docserver::{Document, StoreLayout};
use docimport_openalex::{ImportConfig, ImportOptions, run};
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

const ARTICLE: &str = r#"{"id": "https://openalex.org/W100", "doi": "https://doi.org/10.1000/a", "title": "Alpha", "language": "en", "type": "article", "publication_date": "2021-05-04", "publication_year": 2021, "primary_location": {"source": {"id": "https://openalex.org/S1", "display_name": "Journal of Tests", "type": "journal", "issn": ["1234-5678"]}}, "authorships": [{"author": {"id": "https://openalex.org/A0", "display_name": "NULL AUTHOR_ID"}, "institutions": []}, {"author": {"id": "https://openalex.org/A1", "display_name": "Ada Lovelace"}, "institutions": [{"id": "https://openalex.org/I1", "display_name": "Analytical Society"}]}]}"#;
const UNTYPED: &str = r#"{"id": "https://openalex.org/W101", "doi": "https://doi.org/10.1000/b"}"#;
const REPOSITORY: &str = r#"{"id": "https://openalex.org/W102", "type": "article", "publication_date": "2021-05-04", "primary_location": {"source": {"type": "repository"}}}"#;
const CHAPTER: &str = r#"{"id": "https://openalex.org/W103", "type": "book-chapter", "publication_date": "2019-11-30", "primary_location": {"source": {"type": "book series"}}, "ids": {"pmid": "https://pubmed.ncbi.nlm.nih.gov/42"}}"#;

fn write_staging(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("part_0.jsonl"),
        format!("{ARTICLE}\n{UNTYPED}\nnot json\n"),
    )
    .unwrap();

    let file = std::fs::File::create(dir.join("part_1.jsonl.gz")).unwrap();
    let mut enc = GzEncoder::new(file, Compression::fast());
    writeln!(enc, "{REPOSITORY}").unwrap();
    writeln!(enc, "{CHAPTER}").unwrap();
    enc.finish().unwrap();
}

fn config(root: &Path, options: ImportOptions) -> ImportConfig {
    ImportConfig {
        staging_pattern: root.join("staging").join("*.jsonl*").display().to_string(),
        store: StoreLayout {
            dir: root.join("store"),
            ..Default::default()
        },
        options,
    }
}

fn stored(path: &Path) -> Vec<Document> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn import_then_rerun() {
    let root = TempDir::new().unwrap();
    write_staging(&root.path().join("staging"));
    let config = config(root.path(), ImportOptions::default());

    let first = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.imported, 2);
    assert_eq!(first.unrepresentable, 1);
    assert_eq!(first.failed, 2);
    assert_eq!(first.already_present, 0);

    let docs = stored(&config.store.primary_path());
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].version_id, "W100");
    assert_eq!(docs[0].content.authors.len(), 1);
    assert_eq!(docs[0].content.authors[0].name, "Ada Lovelace");
    assert_eq!(docs[0].content.affiliations.len(), 1);
    assert_eq!(docs[1].version_id, "W103");

    // Everything importable is now known to the store
    let second = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.already_present, 2);
    assert_eq!(stored(&config.store.primary_path()).len(), 2);
}

#[test]
fn dry_run_leaves_store_untouched() {
    let root = TempDir::new().unwrap();
    write_staging(&root.path().join("staging"));
    let config = config(
        root.path(),
        ImportOptions {
            dry_run: true,
            limit: None,
        },
    );

    let summary = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.imported, 2);
    assert!(!config.store.primary_path().exists());
}

#[test]
fn separate_output_collection() {
    let root = TempDir::new().unwrap();
    write_staging(&root.path().join("staging"));
    let mut config = config(root.path(), ImportOptions::default());
    config.store.output = Some("imported.jsonl".to_string());

    let summary = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.imported, 2);
    assert!(!config.store.primary_path().exists());
    assert_eq!(stored(&root.path().join("store").join("imported.jsonl")).len(), 2);

    // Output collection takes part in the existence check
    let again = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(again.already_present, 2);
}

#[test]
fn corrupt_store_is_fatal() {
    let root = TempDir::new().unwrap();
    write_staging(&root.path().join("staging"));
    let config = config(root.path(), ImportOptions::default());
    std::fs::create_dir_all(&config.store.dir).unwrap();
    std::fs::write(config.store.primary_path(), "{broken\n").unwrap();

    assert!(run(&config, &ProgressContext::hidden()).is_err());
}
