//! Structural validation of fixed-width catalog lines
//!
//! The only structural check is the record width. Field contents are not
//! inspected here; a line of the right width may still fail extraction.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a trailing line terminator is treated when measuring width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminatorPolicy {
    /// Remove a trailing `\n` or `\r\n` before measuring
    #[default]
    Strip,
    /// Measure the line exactly as read, terminator included
    Include,
}

impl FromStr for TerminatorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(TerminatorPolicy::Strip),
            "include" => Ok(TerminatorPolicy::Include),
            other => Err(Error::configuration(format!(
                "Unknown terminator policy '{}' (expected 'strip' or 'include')",
                other
            ))),
        }
    }
}

impl fmt::Display for TerminatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminatorPolicy::Strip => f.write_str("strip"),
            TerminatorPolicy::Include => f.write_str("include"),
        }
    }
}

/// Remove one trailing `\n` or `\r\n`
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(content) => content.strip_suffix(b"\r").unwrap_or(content),
        None => line,
    }
}

/// A line that passed width validation
///
/// Only [`RecordValidator::validate`] creates these, so holding one is proof
/// that field extraction's precondition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine<'a> {
    content: &'a [u8],
}

impl<'a> ValidatedLine<'a> {
    /// Line content without its terminator
    pub fn content(&self) -> &'a [u8] {
        self.content
    }
}

/// Width-based classifier for raw lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordValidator {
    record_width: usize,
    terminator: TerminatorPolicy,
}

impl RecordValidator {
    pub fn new(record_width: usize, terminator: TerminatorPolicy) -> Self {
        Self {
            record_width,
            terminator,
        }
    }

    pub fn record_width(&self) -> usize {
        self.record_width
    }

    pub fn terminator(&self) -> TerminatorPolicy {
        self.terminator
    }

    /// Length of the line as compared against the record width
    pub fn measured_len(&self, line: impl AsRef<[u8]>) -> usize {
        let line = line.as_ref();
        match self.terminator {
            TerminatorPolicy::Strip => strip_terminator(line).len(),
            TerminatorPolicy::Include => line.len(),
        }
    }

    /// True iff the measured length equals the record width exactly
    pub fn is_valid(&self, line: impl AsRef<[u8]>) -> bool {
        self.measured_len(line) == self.record_width
    }

    /// Classify a line, returning the extraction token when it is valid
    pub fn validate<'a>(&self, line: &'a [u8]) -> Option<ValidatedLine<'a>> {
        self.is_valid(line).then(|| ValidatedLine {
            content: strip_terminator(line),
        })
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(crate::constants::RECORD_WIDTH, TerminatorPolicy::Strip)
    }
}
