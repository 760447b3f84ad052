//! docimport-openalex: OpenAlex works -> docserver documents
//!
//! Reads staged OpenAlex work records, maps each one to the docserver
//! document model and saves those not already present in the store.
//!
//! # Example
//!
//! ```no_run
//! use docimport_core::ProgressContext;
//! use docimport_openalex::{ImportConfig, run};
//!
//! let config = ImportConfig {
//!     staging_pattern: "staging/works_*.jsonl.gz".to_string(),
//!     ..Default::default()
//! };
//!
//! let summary = run(&config, &ProgressContext::new()).expect("import failed");
//! println!("Imported {} works", summary.imported);
//! ```

pub mod abstract_decode;
pub mod affiliations;
pub mod classify;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod mapper;
pub mod runner;
pub mod schema;
pub mod staging;

pub use config::{ImportConfig, ImportOptions};
pub use error::{ClassifyError, ConversionError, MapError};
pub use mapper::{map_document, map_work};
pub use runner::{Outcome, RunSummary, import_record, run, run_records};
pub use schema::WorkRecord;
