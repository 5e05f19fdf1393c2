//! Packed binary export of orbital elements
//!
//! Each parsed record becomes six little-endian `f32` values (24 bytes):
//! mean anomaly, argument of perihelion, longitude of ascending node,
//! inclination, eccentricity, semimajor axis. The file has no header; the
//! record count is the file size divided by 24.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::app::models::OrbitalElementSet;
use crate::app::services::catalog_scanner::{
    CatalogScanner, RecordOutcome, ScanStatistics, open_catalog,
};
use crate::constants::EXPORT_BYTES_PER_RECORD;
use crate::{Error, Result};

/// Result of an export run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExportSummary {
    /// Records written to the output
    pub asteroid_count: u64,

    /// Mean eccentricity of the written records (`None` when nothing was written)
    pub average_eccentricity: Option<f64>,

    pub bytes_written: u64,

    /// Line counters of the underlying scan
    pub statistics: ScanStatistics,
}

/// Streams element sets to a writer as packed `f32` sextuplets
#[derive(Debug)]
pub struct BinaryExporter<W: Write> {
    writer: W,
    asteroid_count: u64,
    total_eccentricity: f64,
}

impl<W: Write> BinaryExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            asteroid_count: 0,
            total_eccentricity: 0.0,
        }
    }

    /// Append one element set
    pub fn write_record(&mut self, elements: &OrbitalElementSet) -> std::io::Result<()> {
        let mut packed = [0u8; EXPORT_BYTES_PER_RECORD];
        for (chunk, value) in packed.chunks_exact_mut(4).zip(elements.to_f32_array()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        self.writer.write_all(&packed)?;

        self.asteroid_count += 1;
        self.total_eccentricity += elements.eccentricity.value;
        Ok(())
    }

    pub fn asteroid_count(&self) -> u64 {
        self.asteroid_count
    }

    /// Mean eccentricity of the records written so far
    pub fn average_eccentricity(&self) -> Option<f64> {
        (self.asteroid_count > 0).then(|| self.total_eccentricity / self.asteroid_count as f64)
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Export every parseable record of a catalog reader
///
/// Malformed records are logged and skipped; a read or write failure
/// aborts the export.
pub fn export_catalog<R, W>(scanner: &CatalogScanner, reader: R, writer: W) -> Result<ExportSummary>
where
    R: BufRead,
    W: Write,
{
    let mut exporter = BinaryExporter::new(writer);
    let mut records = scanner.records(reader);

    for outcome in records.by_ref() {
        match outcome? {
            RecordOutcome::Parsed(record) => exporter
                .write_record(&record.elements)
                .map_err(|e| Error::io("Failed to write exported record", e))?,
            RecordOutcome::Malformed { line_number, error } => {
                warn!("Unable to parse line {}: {}", line_number, error);
            }
        }
    }

    let statistics = records.into_statistics();
    let asteroid_count = exporter.asteroid_count();
    let average_eccentricity = exporter.average_eccentricity();
    exporter
        .finish()
        .map_err(|e| Error::io("Failed to flush export output", e))?;

    debug!("{}", statistics.summary());
    Ok(ExportSummary {
        asteroid_count,
        average_eccentricity,
        bytes_written: asteroid_count * EXPORT_BYTES_PER_RECORD as u64,
        statistics,
    })
}

/// Export a catalog file to a binary file
pub fn export_path(scanner: &CatalogScanner, input: &Path, output: &Path) -> Result<ExportSummary> {
    info!("Exporting {} to {}", input.display(), output.display());

    let reader = open_catalog(input)?;
    let file = File::create(output).map_err(|e| {
        Error::io(
            format!("Failed to create output file {}", output.display()),
            e,
        )
    })?;

    let summary = export_catalog(scanner, reader, BufWriter::new(file))?;
    info!(
        "Exported {} asteroids ({} bytes)",
        summary.asteroid_count, summary.bytes_written
    );
    Ok(summary)
}
