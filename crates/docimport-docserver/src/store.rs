//! Target store: the collections an import run reads and writes
//!
//! Layout:
//! ```text
//! {dir}/
//! ├── documents.jsonl   # primary collection
//! ├── versions.jsonl    # staging/versions collection
//! └── {output}.jsonl    # write target (defaults to the primary collection)
//! ```

use std::path::PathBuf;

use anyhow::Result;

use crate::collection::{Collection, DocumentSink, IdentifierLookup};
use crate::model::{Document, DocumentIdentifierSystem};

/// File names of the collections inside the store directory
#[derive(Debug, Clone)]
pub struct StoreLayout {
    pub dir: PathBuf,
    pub primary: String,
    pub versions: String,
    /// `None` writes into the primary collection
    pub output: Option<String>,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./store"),
            primary: "documents.jsonl".to_string(),
            versions: "versions.jsonl".to_string(),
            output: None,
        }
    }
}

impl StoreLayout {
    pub fn primary_path(&self) -> PathBuf {
        self.dir.join(&self.primary)
    }

    pub fn versions_path(&self) -> PathBuf {
        self.dir.join(&self.versions)
    }

    /// Output collection path, if distinct from the primary one
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output
            .as_ref()
            .filter(|o| **o != self.primary)
            .map(|o| self.dir.join(o))
    }
}

/// Primary + versions collections, plus an optional separate output.
///
/// A document "exists" if any collection knows any of its identifiers.
#[derive(Debug)]
pub struct TargetStore {
    primary: Collection,
    versions: Collection,
    output: Option<Collection>,
}

impl TargetStore {
    pub fn new(primary: Collection, versions: Collection, output: Option<Collection>) -> Self {
        Self {
            primary,
            versions,
            output,
        }
    }

    /// Open every collection of `layout`
    pub fn open(layout: &StoreLayout) -> Result<Self> {
        let primary = Collection::open(&layout.primary_path())?;
        let versions = Collection::open(&layout.versions_path())?;
        let output = layout
            .output_path()
            .map(|p| Collection::open(&p))
            .transpose()?;
        Ok(Self::new(primary, versions, output))
    }

    /// Store whose collections never touch disk
    pub fn in_memory() -> Self {
        Self::new(
            Collection::in_memory("documents"),
            Collection::in_memory("versions"),
            None,
        )
    }

    pub fn primary(&self) -> &Collection {
        &self.primary
    }

    pub fn versions(&self) -> &Collection {
        &self.versions
    }

    /// Collection receiving saved documents
    pub fn output(&self) -> &Collection {
        self.output.as_ref().unwrap_or(&self.primary)
    }
}

impl IdentifierLookup for TargetStore {
    fn exists_by_identifier(&self, system: DocumentIdentifierSystem, value: &str) -> Result<bool> {
        if self.primary.exists_by_identifier(system, value)?
            || self.versions.exists_by_identifier(system, value)?
        {
            return Ok(true);
        }
        match &self.output {
            Some(output) => output.exists_by_identifier(system, value),
            None => Ok(false),
        }
    }
}

impl DocumentSink for TargetStore {
    fn save(&mut self, document: &Document) -> Result<()> {
        match &mut self.output {
            Some(output) => output.save(document),
            None => self.primary.save(document),
        }
    }
}
