//! Catalog scanner implementation
//!
//! One pass over a line source: every line increments `line_count` and
//! exactly one of the valid/invalid counters. When field extraction is
//! enabled, valid lines are also parsed and the outcome counted.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, trace};

use super::line_source::{LineReader, open_catalog};
use super::record_stream::RecordStream;
use super::stats::ScanStatistics;
use crate::app::services::field_extractor::FieldExtractor;
use crate::app::services::record_schema::RecordSchema;
use crate::app::services::record_validator::RecordValidator;
use crate::config::ScanConfig;
use crate::{Error, Result};

/// Streaming validator and parser for astorb catalogs
///
/// The scanner holds only the shared schema and its configuration; each
/// scan owns its own statistics, so one scanner can serve several catalogs
/// from different threads.
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    schema: Arc<RecordSchema>,
    pub(super) validator: RecordValidator,
    pub(super) extractor: FieldExtractor,
    config: ScanConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl CatalogScanner {
    /// Create a scanner for a schema
    ///
    /// The configuration's record width must match the schema's.
    pub fn new(schema: Arc<RecordSchema>, config: &ScanConfig) -> Result<Self> {
        config.validate_for(&schema)?;

        if config.record_width != schema.record_width() {
            return Err(Error::configuration(format!(
                "Configured record width {} does not match schema width {}",
                config.record_width,
                schema.record_width()
            )));
        }

        let validator = RecordValidator::new(schema.record_width(), config.terminator);
        let extractor = FieldExtractor::new(&schema)?.with_epoch(config.extract_epoch);

        Ok(Self {
            schema,
            validator,
            extractor,
            config: config.clone(),
            cancel: None,
        })
    }

    /// Create a scanner for the astorb layout at the configured record width
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let schema = RecordSchema::astorb().with_record_width(config.record_width)?;
        Self::new(Arc::new(schema), config)
    }

    /// Stop scans cooperatively once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub(super) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub(super) fn invalid_limit_reached(&self, stats: &ScanStatistics) -> bool {
        self.config
            .max_invalid_lines
            .is_some_and(|limit| stats.invalid_line_count >= limit)
    }

    pub(super) fn new_statistics(&self) -> ScanStatistics {
        ScanStatistics::with_sample_limit(self.config.max_error_samples)
    }

    /// Scan a buffered reader to the end
    pub fn scan<R: BufRead>(&self, reader: R) -> Result<ScanStatistics> {
        self.scan_with_progress(reader, |_| {})
    }

    /// Scan a buffered reader, reporting running counts every
    /// `progress_interval` lines
    ///
    /// A read error part-way through aborts the scan with [`Error::Io`].
    pub fn scan_with_progress<R, F>(&self, reader: R, mut on_progress: F) -> Result<ScanStatistics>
    where
        R: BufRead,
        F: FnMut(&ScanStatistics),
    {
        let mut lines = LineReader::new(reader);
        let mut stats = self.new_statistics();

        loop {
            if self.is_cancelled() {
                debug!("Scan cancelled after {} lines", stats.line_count);
                stats.stopped_early = true;
                break;
            }

            let line_number = lines.line_number() + 1;
            let line = match lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    return Err(Error::io(
                        format!("Failed to read catalog line {}", line_number),
                        e,
                    ));
                }
            };

            let flow = self.step(line, line_number, &mut stats);
            if stats.line_count % self.config.progress_interval == 0 {
                on_progress(&stats);
            }
            if flow.is_break() {
                break;
            }
        }

        on_progress(&stats);
        debug!("{}", stats.summary());
        Ok(stats)
    }

    /// Scan an in-memory sequence of lines
    ///
    /// Each item is measured as given, so terminators are only present if
    /// the caller left them in.
    pub fn scan_lines<I, L>(&self, lines: I) -> ScanStatistics
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut stats = self.new_statistics();

        for (index, line) in lines.into_iter().enumerate() {
            if self.is_cancelled() {
                stats.stopped_early = true;
                break;
            }
            if self
                .step(line.as_ref(), index as u64 + 1, &mut stats)
                .is_break()
            {
                break;
            }
        }

        stats
    }

    /// Open and scan a catalog file
    pub fn scan_path(&self, path: &Path) -> Result<ScanStatistics> {
        self.scan_path_with_progress(path, |_| {})
    }

    /// Open and scan a catalog file with a progress callback
    pub fn scan_path_with_progress<F>(&self, path: &Path, on_progress: F) -> Result<ScanStatistics>
    where
        F: FnMut(&ScanStatistics),
    {
        info!("Scanning catalog: {}", path.display());
        let reader = open_catalog(path)?;
        let stats = self.scan_with_progress(reader, on_progress)?;

        info!(
            "{}: {} lines ({} valid, {} invalid)",
            path.display(),
            stats.line_count,
            stats.valid_line_count,
            stats.invalid_line_count
        );
        Ok(stats)
    }

    /// Lazily parse the valid lines of a reader into records
    pub fn records<R: BufRead>(&self, reader: R) -> RecordStream<'_, R> {
        RecordStream::new(self, reader)
    }

    /// Classify one line, extracting it if enabled
    fn step(&self, line: &[u8], line_number: u64, stats: &mut ScanStatistics) -> ControlFlow<()> {
        match self.validator.validate(line) {
            Some(validated) => {
                stats.record_valid();
                if self.config.extract_fields {
                    match self.extractor.record(&validated, line_number) {
                        Ok(_) => stats.record_parsed(),
                        Err(e) => {
                            trace!("Malformed record at line {}: {}", line_number, e);
                            stats.record_malformed(line_number, &e);
                        }
                    }
                }
                ControlFlow::Continue(())
            }
            None => {
                trace!(
                    "Invalid line {}: width {}",
                    line_number,
                    self.validator.measured_len(line)
                );
                stats.record_invalid();

                if self.invalid_limit_reached(stats) {
                    debug!(
                        "Invalid line limit reached at line {}, stopping scan",
                        line_number
                    );
                    stats.stopped_early = true;
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        }
    }
}
