//! Scan statistics and shard merging

use crate::app::services::field_extractor::MalformedFieldError;
use crate::constants::DEFAULT_MAX_ERROR_SAMPLES;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters accumulated over one or more catalog scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    /// Total number of lines read
    pub line_count: u64,

    /// Lines whose width matched the record width
    pub valid_line_count: u64,

    /// Lines whose width did not match
    pub invalid_line_count: u64,

    /// Valid lines whose fields all extracted cleanly
    pub parsed_record_count: u64,

    /// Valid lines with at least one malformed field
    pub malformed_record_count: u64,

    /// The scan ended before the end of its source
    pub stopped_early: bool,

    /// First few malformed-field messages for debugging
    pub error_samples: Vec<String>,

    #[serde(skip, default = "default_sample_limit")]
    max_error_samples: usize,
}

fn default_sample_limit() -> usize {
    DEFAULT_MAX_ERROR_SAMPLES
}

impl ScanStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::with_sample_limit(DEFAULT_MAX_ERROR_SAMPLES)
    }

    /// Empty statistics keeping at most `max_error_samples` messages
    pub fn with_sample_limit(max_error_samples: usize) -> Self {
        Self {
            line_count: 0,
            valid_line_count: 0,
            invalid_line_count: 0,
            parsed_record_count: 0,
            malformed_record_count: 0,
            stopped_early: false,
            error_samples: Vec::new(),
            max_error_samples,
        }
    }

    pub fn record_valid(&mut self) {
        self.line_count += 1;
        self.valid_line_count += 1;
    }

    pub fn record_invalid(&mut self) {
        self.line_count += 1;
        self.invalid_line_count += 1;
    }

    pub fn record_parsed(&mut self) {
        self.parsed_record_count += 1;
    }

    /// Count a malformed record, keeping its message while samples remain
    pub fn record_malformed(&mut self, line_number: u64, error: &MalformedFieldError) {
        self.malformed_record_count += 1;
        self.add_error_sample(format!("line {}: {}", line_number, error));
    }

    /// Add an error message unless the sample limit is reached
    pub fn add_error_sample(&mut self, message: String) {
        if self.error_samples.len() < self.max_error_samples {
            self.error_samples.push(message);
        }
    }

    /// Sum another shard's counters into this one
    pub fn merge(&mut self, other: &ScanStatistics) {
        self.line_count += other.line_count;
        self.valid_line_count += other.valid_line_count;
        self.invalid_line_count += other.invalid_line_count;
        self.parsed_record_count += other.parsed_record_count;
        self.malformed_record_count += other.malformed_record_count;
        self.stopped_early |= other.stopped_early;
        for sample in &other.error_samples {
            self.add_error_sample(sample.clone());
        }
    }

    /// True when every line was counted exactly once
    pub fn is_consistent(&self) -> bool {
        self.line_count == self.valid_line_count + self.invalid_line_count
    }

    /// Percentage of lines that were structurally valid
    pub fn valid_rate(&self) -> f64 {
        if self.line_count == 0 {
            0.0
        } else {
            (self.valid_line_count as f64 / self.line_count as f64) * 100.0
        }
    }

    /// Percentage of extracted records that parsed cleanly
    pub fn parse_rate(&self) -> f64 {
        let attempted = self.parsed_record_count + self.malformed_record_count;
        if attempted == 0 {
            0.0
        } else {
            (self.parsed_record_count as f64 / attempted as f64) * 100.0
        }
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "Scan Summary: {} lines | valid: {} ({:.1}%) | invalid: {} | \
             parsed: {} | malformed: {}{}",
            self.line_count,
            self.valid_line_count,
            self.valid_rate(),
            self.invalid_line_count,
            self.parsed_record_count,
            self.malformed_record_count,
            if self.stopped_early { " | stopped early" } else { "" }
        )
    }
}

impl Default for ScanStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl AddAssign<&ScanStatistics> for ScanStatistics {
    fn add_assign(&mut self, other: &ScanStatistics) {
        self.merge(other);
    }
}
