//! docimport - import OpenAlex works into a docserver store
//!
//! Reads staged OpenAlex work records, maps them to docserver documents
//! and saves those the store does not know yet.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docimport_core::{ProgressContext, Verbosity};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docimport")]
#[command(about = "Import OpenAlex works into a docserver store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./docimport.toml or ~/.config/docimport/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Import every staged work not already in the store
    Run(cmd::run::RunArgs),
    /// Map one staged work and print the resulting document
    Map(cmd::map::MapArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  - progress bars show activity
    //   non-TTY: info unless --debug          - logs are the only progress indicator
    let is_tty = progress.is_tty();
    let verbosity = if cli.debug {
        Verbosity::Debug
    } else if is_tty {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };
    let multi = if is_tty { Some(progress.multi()) } else { None };
    docimport_core::init_logging(verbosity, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Map(args) => cmd::map::run(args),
        Command::Config => {
            let store = config.store_layout();
            cmd::print_table(
                "Setting",
                &[
                    ("Staging pattern", config.staging.pattern.clone()),
                    ("Store directory", store.dir.display().to_string()),
                    ("Primary collection", store.primary_path().display().to_string()),
                    ("Versions collection", store.versions_path().display().to_string()),
                    (
                        "Output collection",
                        store
                            .output_path()
                            .unwrap_or_else(|| store.primary_path())
                            .display()
                            .to_string(),
                    ),
                    ("Dry run", config.import.dry_run.to_string()),
                    (
                        "Limit",
                        config
                            .import
                            .limit
                            .map_or_else(|| "none".to_string(), |n| n.to_string()),
                    ),
                ],
            );
            Ok(())
        }
    }
}
