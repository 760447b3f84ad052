//! Import progress display
//!
//! On a terminal: one byte bar per staged file being read and a spinner
//! line carrying the running outcome counts. Otherwise every bar is hidden
//! and log lines report progress instead.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const LABEL_WIDTH: usize = 24;

const FILE_TEMPLATE: &str =
    "{prefix:<24.dim} {bar:30.green/dim} {binary_bytes:>7}/{binary_total_bytes:7} {eta:>4}";
const IMPORT_TEMPLATE: &str = "{spinner:.green} [{elapsed}] {wide_msg}";

/// Bars of one import run, drawn only when stderr is a terminal.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    pub fn new() -> Self {
        Self::with_tty(std::io::stderr().is_terminal())
    }

    /// Context that never draws (tests, `map`, piped output)
    pub fn hidden() -> Self {
        Self::with_tty(false)
    }

    fn with_tty(is_tty: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty,
        }
    }

    fn add(&self, len: u64, template: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new(len));
        // Templates are constants; a bad one falls back to the default look
        if let Ok(style) = ProgressStyle::with_template(template) {
            pb.set_style(style.progress_chars("--"));
        }
        pb
    }

    /// Compressed-bytes bar for a staged file of `total_bytes`
    pub fn file_bar(&self, label: &str, total_bytes: u64) -> ProgressBar {
        let pb = self.add(total_bytes, FILE_TEMPLATE);
        pb.set_prefix(label.chars().take(LABEL_WIDTH).collect::<String>());
        pb
    }

    /// Spinner line for the record loop; the driver sets its message
    pub fn import_line(&self) -> ProgressBar {
        let pb = self.add(0, IMPORT_TEMPLATE);
        if self.is_tty {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        pb
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Shared with the log bridge so log lines print above the bars
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedProgress = Arc<ProgressContext>;

/// `1234567` -> `"1,234,567"`
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    out.push_str(&digits[..head]);
    for (i, group) in digits.as_bytes()[head..].chunks(3).enumerate() {
        if head > 0 || i > 0 {
            out.push(',');
        }
        // ASCII digits only
        out.extend(group.iter().map(|&b| b as char));
    }
    out
}
