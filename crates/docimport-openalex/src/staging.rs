//! Staged work records on disk
//!
//! One JSON object per line, in plain `.jsonl` or gzip-compressed
//! `.jsonl.gz` files. Blank lines are ignored.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use docimport_core::{ByteCounter, LineReader, ProgressContext, next_line, open_lines};
use indicatif::ProgressBar;

use crate::schema::WorkRecord;

struct StagedFile {
    path: PathBuf,
    reader: LineReader,
    bytes: ByteCounter,
    bar: ProgressBar,
    /// 1-based index of the last record read
    record: usize,
}

/// Iterator over every record of a set of staged files, in file order.
///
/// A record that fails to parse yields an `Err` carrying its location and
/// iteration continues with the next one. A read error abandons the rest
/// of that file.
pub struct StagedRecords {
    files: std::vec::IntoIter<StagedFile>,
    current: Option<StagedFile>,
    buf: String,
}

impl StagedRecords {
    /// Open all `paths` up front; a file that cannot be opened fails the
    /// whole set.
    pub fn open(paths: &[PathBuf], progress: &ProgressContext) -> Result<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let (reader, bytes, total) = open_lines(path)
                .with_context(|| format!("failed to open staged file {}", path.display()))?;
            let bar = progress.file_bar(&file_label(path), total);
            files.push(StagedFile {
                path: path.clone(),
                reader,
                bytes,
                bar,
                record: 0,
            });
        }
        log::debug!("opened {} staged files", files.len());

        let mut files = files.into_iter();
        let current = files.next();
        Ok(Self {
            files,
            current,
            buf: String::new(),
        })
    }

    fn advance_file(&mut self) {
        if let Some(done) = self.current.take() {
            done.bar.finish_and_clear();
            log::debug!("{}: {} records", done.path.display(), done.record);
        }
        self.current = self.files.next();
    }
}

impl Iterator for StagedRecords {
    type Item = Result<WorkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let file = self.current.as_mut()?;
            match next_line(&mut file.reader, &mut self.buf) {
                Ok(true) => {
                    file.record += 1;
                    file.bar.set_position(file.bytes.load(Ordering::Relaxed));
                    let parsed = WorkRecord::from_json(&self.buf).with_context(|| {
                        format!(
                            "malformed record {} in {}",
                            file.record,
                            file.path.display()
                        )
                    });
                    return Some(parsed);
                }
                Ok(false) => self.advance_file(),
                Err(e) => {
                    let err = anyhow::Error::new(e).context(format!(
                        "failed reading {} after record {}",
                        file.path.display(),
                        file.record
                    ));
                    self.advance_file();
                    return Some(Err(err));
                }
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
