//! JSON Lines document collections with an identifier index
//!
//! Each collection is one file holding one serialized [`Document`] per
//! line. Opening a collection scans the file once and indexes every
//! `(system, value)` identifier of every document; saving appends a line
//! and extends the index, so documents written earlier in a run are seen
//! by later existence checks.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use crate::model::{Document, DocumentIdentifierSystem};

/// Lookup of documents by identifier
pub trait IdentifierLookup {
    fn exists_by_identifier(&self, system: DocumentIdentifierSystem, value: &str) -> Result<bool>;
}

/// Destination for imported documents
pub trait DocumentSink {
    fn save(&mut self, document: &Document) -> Result<()>;
}

/// One docserver collection
pub struct Collection {
    name: String,
    path: Option<PathBuf>,
    index: FxHashSet<(DocumentIdentifierSystem, String)>,
    len: usize,
    writer: Option<BufWriter<File>>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Collection {
    /// Open a file-backed collection, indexing existing documents.
    ///
    /// A missing file is an empty collection; it is created on first save.
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut collection = Self {
            name,
            path: Some(path.to_path_buf()),
            index: FxHashSet::default(),
            len: 0,
            writer: None,
        };

        if path.exists() {
            collection.load(path)?;
        }

        log::info!(
            "collection {}: {} documents, {} identifiers",
            collection.name,
            collection.len,
            collection.index.len()
        );
        Ok(collection)
    }

    /// Collection that lives only in memory (dry runs, tests)
    pub fn in_memory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            index: FxHashSet::default(),
            len: 0,
            writer: None,
        }
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let reader = BufReader::new(file);

        for (lineno, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let document: Document = serde_json::from_str(&line).with_context(|| {
                format!("malformed document at {}:{}", path.display(), lineno + 1)
            })?;
            self.index_document(&document);
        }
        Ok(())
    }

    fn index_document(&mut self, document: &Document) {
        for id in &document.content.identifiers {
            self.index.insert((id.system, id.value.clone()));
        }
        self.len += 1;
    }

    fn writer(&mut self) -> Result<Option<&mut BufWriter<File>>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if self.writer.is_none() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open {} for append", path.display()))?;
            self.writer = Some(BufWriter::new(file));
        }
        Ok(self.writer.as_mut())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of documents in the collection
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl IdentifierLookup for Collection {
    fn exists_by_identifier(&self, system: DocumentIdentifierSystem, value: &str) -> Result<bool> {
        Ok(self.index.contains(&(system, value.to_string())))
    }
}

impl DocumentSink for Collection {
    fn save(&mut self, document: &Document) -> Result<()> {
        let name = self.name.clone();
        if let Some(writer) = self.writer()? {
            serde_json::to_writer(&mut *writer, document)
                .with_context(|| format!("failed to serialize document {}", document.version_id))?;
            writer.write_all(b"\n")?;
            writer
                .flush()
                .with_context(|| format!("failed to write to collection {name}"))?;
        }
        self.index_document(document);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::*;

    pub(crate) fn sample_document(id: &str, doi: Option<&str>) -> Document {
        let mut identifiers = Vec::new();
        if let Some(doi) = doi {
            identifiers.push(DocumentIdentifier::new(DocumentIdentifierSystem::Doi, doi));
        }
        identifiers.push(DocumentIdentifier::new(DocumentIdentifierSystem::Openalex, id));

        Document {
            version_id: id.to_string(),
            initial_source: VersionSourceIdentifier {
                system: VersionSourceSystem::Openalex,
                value: id.to_string(),
            },
            content: DocumentContent {
                document_type: DocumentType::Article,
                source: DocumentSource {
                    source_type: SourceType::Journal,
                    title: Some("Nature".to_string()),
                    issns: vec![],
                    publication_year: Some(2024),
                    volume_issue: VolumeIssue::default(),
                    pages: Pages::default(),
                    publication_date: PublicationDate {
                        year: 2024,
                        month: 1,
                        day: 15,
                    },
                    publishers: vec![],
                    identifiers: vec![],
                },
                title: Title {
                    text: "Sample".to_string(),
                    language: None,
                },
                language: None,
                authors: vec![],
                affiliations: vec![],
                abstracts: vec![],
                identifiers,
                links: vec![],
                references: vec![],
                keywords: vec![],
                access: None,
                phase: PublicationPhase::Definitive,
            },
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let coll = Collection::open(&dir.path().join("documents.jsonl")).unwrap();
        assert!(coll.is_empty());
        assert_eq!(coll.name(), "documents");
    }

    #[test]
    fn save_then_lookup() {
        let mut coll = Collection::in_memory("documents");
        coll.save(&sample_document("W1", Some("10.1/ABC"))).unwrap();

        assert_eq!(coll.len(), 1);
        assert!(coll
            .exists_by_identifier(DocumentIdentifierSystem::Doi, "10.1/ABC")
            .unwrap());
        assert!(coll
            .exists_by_identifier(DocumentIdentifierSystem::Openalex, "W1")
            .unwrap());
        // Same value under another system is a different identifier
        assert!(!coll
            .exists_by_identifier(DocumentIdentifierSystem::Pmid, "W1")
            .unwrap());
    }

    #[test]
    fn reopen_indexes_saved_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("documents.jsonl");

        let mut coll = Collection::open(&path).unwrap();
        coll.save(&sample_document("W1", Some("10.1/ABC"))).unwrap();
        coll.save(&sample_document("W2", None)).unwrap();
        drop(coll);

        let coll = Collection::open(&path).unwrap();
        assert_eq!(coll.len(), 2);
        assert!(coll
            .exists_by_identifier(DocumentIdentifierSystem::Openalex, "W2")
            .unwrap());
        assert!(!coll
            .exists_by_identifier(DocumentIdentifierSystem::Openalex, "W3")
            .unwrap());
    }

    #[test]
    fn malformed_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();

        let err = Collection::open(&path).unwrap_err();
        assert!(format!("{err:#}").contains("documents.jsonl:1"));
    }
}
