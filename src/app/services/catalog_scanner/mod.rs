//! Streaming catalog scanner
//!
//! This module walks a catalog once, in order, classifying every line by
//! width and optionally extracting typed records from the valid ones:
//! - Raw byte lines read through a single reused buffer
//! - Structural counters that never abort on bad lines
//! - Field-level failures counted separately with a capped set of samples
//! - Early stop on an invalid-line limit or a cancellation flag
//! - A lazy record stream for callers that want the parsed records

pub mod line_source;
pub mod record_stream;
pub mod scanner;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use line_source::{LineReader, open_catalog};
pub use record_stream::{RecordOutcome, RecordStream};
pub use scanner::CatalogScanner;
pub use stats::ScanStatistics;
