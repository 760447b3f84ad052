//! Sequential import loop
//!
//! Per record: existence check, map, save. Every failure is local to its
//! record; the loop logs it and moves on.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use docimport_core::{ProgressContext, expand_pattern, fmt_num};
use docimport_docserver::{
    Collection, Document, DocumentIdentifier, DocumentIdentifierSystem, DocumentSink,
    IdentifierLookup, TargetStore,
};
use indicatif::ProgressBar;

use crate::config::{ImportConfig, ImportOptions};
use crate::error::MapError;
use crate::identifiers::find_existing;
use crate::mapper::map_document;
use crate::schema::WorkRecord;
use crate::staging::StagedRecords;

/// What happened to one staged record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Saved (or only indexed in memory, on a dry run)
    Imported,
    /// Some identifier is already known to the store
    AlreadyExists(DocumentIdentifier),
    /// No docserver counterpart for the work type
    Unrepresentable,
    /// Parse, classification, conversion or store error
    Failed,
}

/// Import one work: check, map, save.
pub fn import_record<S>(work: &WorkRecord, store: &mut S) -> Outcome
where
    S: IdentifierLookup + DocumentSink,
{
    match find_existing(work, store) {
        Ok(Some(id)) => {
            log::info!("{}: already present as {id}", work.id);
            return Outcome::AlreadyExists(id);
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("{}: existence check failed: {e:#}", work.id);
            return Outcome::Failed;
        }
    }

    let document = match map_document(work) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            log::info!("{}: work type not representable, skipped", work.id);
            return Outcome::Unrepresentable;
        }
        // Classifier already reported the code
        Err(e @ MapError::Classify(_)) => {
            log::debug!("{}: {e}", work.id);
            return Outcome::Failed;
        }
        Err(e) => {
            log::error!("{}: {e}", work.id);
            return Outcome::Failed;
        }
    };

    match store.save(&document) {
        Ok(()) => {
            log::info!("{}: imported", work.id);
            Outcome::Imported
        }
        Err(e) => {
            log::error!("{}: save failed: {e:#}", work.id);
            Outcome::Failed
        }
    }
}

/// Store view for dry runs: lookups see the real store plus everything
/// "saved" so far, saves only reach an in-memory collection.
struct DryRun<'a, S> {
    store: &'a S,
    shadow: Collection,
}

impl<'a, S: IdentifierLookup> DryRun<'a, S> {
    fn new(store: &'a S) -> Self {
        Self {
            store,
            shadow: Collection::in_memory("dry-run"),
        }
    }
}

impl<S: IdentifierLookup> IdentifierLookup for DryRun<'_, S> {
    fn exists_by_identifier(&self, system: DocumentIdentifierSystem, value: &str) -> Result<bool> {
        Ok(self.store.exists_by_identifier(system, value)?
            || self.shadow.exists_by_identifier(system, value)?)
    }
}

impl<S> DocumentSink for DryRun<'_, S> {
    fn save(&mut self, document: &Document) -> Result<()> {
        log::debug!("{}: dry run, kept in memory only", document.version_id);
        self.shadow.save(document)
    }
}

/// Drive `records` through [`import_record`] one at a time.
///
/// On a dry run nothing reaches `store`, but a work staged twice is still
/// reported as present the second time.
pub fn run_records<I, S>(
    records: I,
    store: &mut S,
    options: &ImportOptions,
    pb: &ProgressBar,
) -> RunSummary
where
    I: IntoIterator<Item = Result<WorkRecord>>,
    S: IdentifierLookup + DocumentSink,
{
    let limit = options.limit.unwrap_or(usize::MAX);
    if options.dry_run {
        drive(records, &mut DryRun::new(&*store), limit, pb)
    } else {
        drive(records, store, limit, pb)
    }
}

fn drive<I, S>(records: I, store: &mut S, limit: usize, pb: &ProgressBar) -> RunSummary
where
    I: IntoIterator<Item = Result<WorkRecord>>,
    S: IdentifierLookup + DocumentSink,
{
    let start = Instant::now();
    let mut summary = RunSummary::empty();

    for record in records.into_iter().take(limit) {
        let outcome = match record {
            Ok(work) => import_record(&work, store),
            Err(e) => {
                log::error!("{e:#}");
                Outcome::Failed
            }
        };
        summary.record(&outcome);
        pb.set_message(summary.progress_message());
    }

    summary.elapsed = start.elapsed();
    summary
}

/// Run a full import from staged files into the configured store
pub fn run(config: &ImportConfig, progress: &ProgressContext) -> Result<RunSummary> {
    let start = Instant::now();

    let files = expand_pattern(&config.staging_pattern)
        .with_context(|| format!("bad staging pattern {}", config.staging_pattern))?;
    if files.is_empty() {
        log::warn!("No staged files match {}", config.staging_pattern);
        return Ok(RunSummary::empty());
    }
    log::info!(
        "Importing from {} staged files into {}",
        files.len(),
        config.store.dir.display()
    );
    if config.options.dry_run {
        log::info!("Dry run: nothing will be saved");
    }

    let mut store = TargetStore::open(&config.store)
        .with_context(|| format!("failed to open store {}", config.store.dir.display()))?;
    let records = StagedRecords::open(&files, progress)?;

    let pb = progress.import_line();
    let mut summary = run_records(records, &mut store, &config.options, &pb);
    pb.finish_and_clear();

    summary.elapsed = start.elapsed();
    summary.log();
    Ok(summary)
}

/// Counts of record outcomes over a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub imported: usize,
    pub already_present: usize,
    pub unrepresentable: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Imported => self.imported += 1,
            Outcome::AlreadyExists(_) => self.already_present += 1,
            Outcome::Unrepresentable => self.unrepresentable += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    fn progress_message(&self) -> String {
        format!(
            "{} records: {} imported, {} present, {} skipped, {} failed",
            fmt_num(self.total),
            fmt_num(self.imported),
            fmt_num(self.already_present),
            fmt_num(self.unrepresentable),
            fmt_num(self.failed)
        )
    }

    pub fn log(&self) {
        log::info!("=== Import Summary ===");
        log::info!("Records: {}", fmt_num(self.total));
        log::info!(
            "Imported: {}, already present: {}, not representable: {}, failed: {}",
            fmt_num(self.imported),
            fmt_num(self.already_present),
            fmt_num(self.unrepresentable),
            fmt_num(self.failed)
        );
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
        let secs = self.elapsed.as_secs_f64();
        if self.total > 0 && secs > 0.0 {
            log::info!("Throughput: {:.0} records/sec", self.total as f64 / secs);
        }
    }
}
