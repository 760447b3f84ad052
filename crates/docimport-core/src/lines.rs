//! Line readers over staged files.
//!
//! Staged records are stored as JSON Lines, either plain (`.jsonl`) or
//! gzip-compressed (`.jsonl.gz`). Compression is picked from the file
//! extension; the byte counter tracks compressed bytes read from disk so
//! progress can be reported against the file size.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

/// Buffer size for staged file readers (256KB)
const READ_BUF_SIZE: usize = 256 * 1024;

/// Shared byte counter for progress tracking
pub type ByteCounter = Arc<AtomicU64>;

/// Buffered line reader over a plain or gzip-compressed staged file
pub type LineReader = BufReader<Box<dyn Read + Send>>;

/// Reader wrapper that tracks bytes read
pub struct CountingReader<R> {
    inner: R,
    count: ByteCounter,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a staged file for line-by-line reading.
///
/// Returns (reader, byte_counter, file_size)
pub fn open_lines(path: &Path) -> io::Result<(LineReader, ByteCounter, u64)> {
    let file = File::open(path)?;
    let total = file.metadata()?.len();

    let counter: ByteCounter = Arc::new(AtomicU64::new(0));
    let counting = CountingReader {
        inner: file,
        count: counter.clone(),
    };

    let inner: Box<dyn Read + Send> = if is_gzip(path) {
        Box::new(MultiGzDecoder::new(counting))
    } else {
        Box::new(counting)
    };

    Ok((BufReader::with_capacity(READ_BUF_SIZE, inner), counter, total))
}

/// Expand a glob pattern into a sorted list of files.
///
/// A pattern without glob metacharacters that names an existing file is
/// returned as-is. Directories are skipped.
pub fn expand_pattern(pattern: &str) -> io::Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("skipping unreadable path: {e}");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();

    // Sort for deterministic processing order
    files.sort();
    Ok(files)
}

/// Read the next non-blank line into `buf`, trimming the line terminator.
///
/// Returns `Ok(false)` at end of input.
pub fn next_line(reader: &mut impl BufRead, buf: &mut String) -> io::Result<bool> {
    loop {
        buf.clear();
        if reader.read_line(buf)? == 0 {
            return Ok(false);
        }
        let trimmed_len = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed_len);
        if !buf.trim().is_empty() {
            return Ok(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn read_all(path: &Path) -> Vec<String> {
        let (mut reader, _, _) = open_lines(path).unwrap();
        let mut buf = String::new();
        let mut out = Vec::new();
        while next_line(&mut reader, &mut buf).unwrap() {
            out.push(buf.clone());
        }
        out
    }

    #[test]
    fn plain_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.jsonl");
        std::fs::write(&path, "{\"a\":1}\n\n{\"b\":2}\r\n").unwrap();

        assert_eq!(read_all(&path), vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn gzip_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.jsonl.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"{\"a\":1}\n{\"b\":2}\n").unwrap();
        enc.finish().unwrap();

        assert_eq!(read_all(&path), vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn byte_counter_tracks_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.jsonl");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let (mut reader, counter, total) = open_lines(&path).unwrap();
        let mut buf = String::new();
        while next_line(&mut reader, &mut buf).unwrap() {}
        assert_eq!(total, 18);
        assert_eq!(counter.load(Ordering::Relaxed), 18);
    }

    #[test]
    fn expand_pattern_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jsonl"), "").unwrap();
        std::fs::write(dir.path().join("a.jsonl"), "").unwrap();
        std::fs::create_dir(dir.path().join("c.jsonl")).unwrap();

        let pattern = dir.path().join("*.jsonl");
        let files = expand_pattern(&pattern.to_string_lossy()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
    }

    #[test]
    fn expand_pattern_invalid() {
        assert!(expand_pattern("[").is_err());
    }
}
