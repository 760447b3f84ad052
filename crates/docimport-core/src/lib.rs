//! Docimport Core - Common infrastructure for the docserver importers
//!
//! This crate provides the pieces every importer shares: logging with
//! progress-bar integration, progress reporting and line readers over
//! staged (optionally gzip-compressed) files.

pub mod lines;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use lines::{ByteCounter, LineReader, expand_pattern, next_line, open_lines};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
