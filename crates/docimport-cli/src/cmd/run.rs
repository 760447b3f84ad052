//! `docimport run` - import staged works into the store

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use docimport_core::{SharedProgress, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Glob of staged files (overrides [staging] pattern)
    #[arg(short, long)]
    pub staging: Option<String>,

    /// Store directory (overrides [store] dir)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Map and check every record without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many staged records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut import = config.import_config();
    if let Some(pattern) = args.staging {
        import.staging_pattern = pattern;
    }
    if let Some(dir) = args.store {
        import.store.dir = dir;
    }
    import.options.dry_run |= args.dry_run;
    if args.limit.is_some() {
        import.options.limit = args.limit;
    }

    log::info!("Importing OpenAlex works");
    log::info!("  Staging: {}", import.staging_pattern);
    log::info!("  Store: {}", import.store.dir.display());

    let summary = docimport_openalex::run(&import, progress)?;

    super::print_table(
        if import.options.dry_run {
            "Import (dry run)"
        } else {
            "Import"
        },
        &[
            ("Records", fmt_num(summary.total)),
            ("Imported", fmt_num(summary.imported)),
            ("Already present", fmt_num(summary.already_present)),
            ("Not representable", fmt_num(summary.unrepresentable)),
            ("Failed", fmt_num(summary.failed)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );

    if summary.failed > 0 {
        log::warn!("{} records failed, see log for details", summary.failed);
    }
    Ok(())
}
