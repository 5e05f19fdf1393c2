//! Line sources for catalog scans

use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Open a catalog file for buffered reading
///
/// Fails with [`Error::SourceUnavailable`] before any line is read when the
/// path cannot be opened.
pub fn open_catalog(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).map_err(|e| Error::source_unavailable(path.display().to_string(), e))?;
    debug!("Opened catalog {}", path.display());
    Ok(BufReader::new(file))
}

/// Reads raw byte lines, terminator included, into one reused buffer
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(crate::constants::RECORD_WIDTH + 2),
            line_number: 0,
        }
    }

    /// Next line including its `\n` (if any), or `None` at end of input
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(&self.buffer))
    }

    /// Number of lines read so far (the 1-based number of the last line)
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}
