//! `docimport map` - show the document one staged record maps to

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use docimport_core::ProgressContext;
use docimport_openalex::map_document;
use docimport_openalex::staging::StagedRecords;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Staged `.jsonl` or `.jsonl.gz` file
    pub file: PathBuf,

    /// 0-based record index within the file
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,
}

pub fn run(args: MapArgs) -> Result<()> {
    let mut records = StagedRecords::open(&[args.file.clone()], &ProgressContext::hidden())?;
    let work = records
        .nth(args.index)
        .with_context(|| {
            format!(
                "{} has no record at index {}",
                args.file.display(),
                args.index
            )
        })??;

    match map_document(&work).with_context(|| format!("failed to map {}", work.id))? {
        Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        None => eprintln!("{}: work type not representable in the docserver", work.id),
    }
    Ok(())
}
