//! Lazy stream of parsed records

use std::io::BufRead;
use tracing::trace;

use super::line_source::LineReader;
use super::scanner::CatalogScanner;
use super::stats::ScanStatistics;
use crate::app::models::AsteroidRecord;
use crate::app::services::field_extractor::MalformedFieldError;
use crate::{Error, Result};

/// Outcome of extracting one structurally valid line
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Parsed(AsteroidRecord),
    Malformed {
        line_number: u64,
        error: MalformedFieldError,
    },
}

impl RecordOutcome {
    pub fn record(&self) -> Option<&AsteroidRecord> {
        match self {
            RecordOutcome::Parsed(record) => Some(record),
            RecordOutcome::Malformed { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<AsteroidRecord> {
        match self {
            RecordOutcome::Parsed(record) => Some(record),
            RecordOutcome::Malformed { .. } => None,
        }
    }
}

/// Iterator over the valid lines of a catalog, parsed into records
///
/// Invalid lines are counted and skipped. A read error is yielded once as
/// `Err` and ends the stream.
#[derive(Debug)]
pub struct RecordStream<'s, R> {
    scanner: &'s CatalogScanner,
    lines: LineReader<R>,
    stats: ScanStatistics,
    finished: bool,
}

impl<'s, R: BufRead> RecordStream<'s, R> {
    pub(super) fn new(scanner: &'s CatalogScanner, reader: R) -> Self {
        Self {
            scanner,
            lines: LineReader::new(reader),
            stats: scanner.new_statistics(),
            finished: false,
        }
    }

    /// Counters for the lines consumed so far
    pub fn statistics(&self) -> &ScanStatistics {
        &self.stats
    }

    pub fn into_statistics(self) -> ScanStatistics {
        self.stats
    }
}

impl<R: BufRead> Iterator for RecordStream<'_, R> {
    type Item = Result<RecordOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if self.scanner.is_cancelled() {
                self.stats.stopped_early = true;
                self.finished = true;
                break;
            }

            let line_number = self.lines.line_number() + 1;
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    break;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(Error::io(
                        format!("Failed to read catalog line {}", line_number),
                        e,
                    )));
                }
            };

            let Some(validated) = self.scanner.validator.validate(line) else {
                trace!("Skipping invalid line {}", line_number);
                self.stats.record_invalid();
                if self.scanner.invalid_limit_reached(&self.stats) {
                    self.stats.stopped_early = true;
                    self.finished = true;
                }
                continue;
            };

            self.stats.record_valid();
            let outcome = match self.scanner.extractor.record(&validated, line_number) {
                Ok(record) => {
                    self.stats.record_parsed();
                    RecordOutcome::Parsed(record)
                }
                Err(error) => {
                    self.stats.record_malformed(line_number, &error);
                    RecordOutcome::Malformed { line_number, error }
                }
            };
            return Some(Ok(outcome));
        }

        None
    }
}
