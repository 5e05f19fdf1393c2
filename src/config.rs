//! Configuration management and validation.
//!
//! Provides the scan configuration shared by the library and the CLI. Values
//! are layered: built-in defaults, then `ASTORB_*` environment variables,
//! then command-line overrides applied through the `with_*` builders.

use crate::app::services::record_schema::RecordSchema;
use crate::app::services::record_validator::TerminatorPolicy;
use crate::constants::{
    DEFAULT_MAX_ERROR_SAMPLES, DEFAULT_PROGRESS_INTERVAL, MAX_WORKERS, RECORD_WIDTH, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Settings for one or more catalog scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Exact width every record must have
    pub record_width: usize,

    /// How a trailing line terminator is counted
    pub terminator: TerminatorPolicy,

    /// Stop the scan after this many invalid lines
    pub max_invalid_lines: Option<u64>,

    /// Also extract fields from valid lines and count malformed records
    pub extract_fields: bool,

    /// Parse the epoch column when extracting records
    pub extract_epoch: bool,

    /// Lines between progress callbacks
    pub progress_interval: u64,

    /// Malformed-field messages kept per scan
    pub max_error_samples: usize,

    /// Catalogs scanned concurrently
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            record_width: RECORD_WIDTH,
            terminator: TerminatorPolicy::Strip,
            max_invalid_lines: None,
            extract_fields: false,
            extract_epoch: true,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_error_samples: DEFAULT_MAX_ERROR_SAMPLES,
            workers: num_cpus::get().clamp(1, MAX_WORKERS),
        }
    }
}

impl ScanConfig {
    /// Defaults overlaid with any `ASTORB_*` environment variables
    pub fn load_layered() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Defaults for the export command
    ///
    /// Published catalogs carry 267 content bytes plus LF, so the newline is
    /// counted towards the 268-byte record.
    pub fn export_defaults() -> Self {
        Self::default().with_terminator(TerminatorPolicy::Include)
    }

    /// Overlay `ASTORB_*` variables from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env_vars::RECORD_WIDTH) {
            self.record_width = parse_env(env_vars::RECORD_WIDTH, &value)?;
        }
        if let Some(value) = lookup(env_vars::TERMINATOR) {
            self.terminator = value.parse::<TerminatorPolicy>()?;
        }
        if let Some(value) = lookup(env_vars::MAX_INVALID) {
            self.max_invalid_lines = Some(parse_env(env_vars::MAX_INVALID, &value)?);
        }
        if let Some(value) = lookup(env_vars::EXTRACT_EPOCH) {
            self.extract_epoch = parse_env_bool(env_vars::EXTRACT_EPOCH, &value)?;
        }
        if let Some(value) = lookup(env_vars::WORKERS) {
            self.workers = parse_env(env_vars::WORKERS, &value)?;
        }

        debug!("Scan configuration after environment: {:?}", self);
        Ok(self)
    }

    /// Set the record width
    pub fn with_record_width(mut self, record_width: usize) -> Self {
        self.record_width = record_width;
        self
    }

    /// Set the terminator policy
    pub fn with_terminator(mut self, terminator: TerminatorPolicy) -> Self {
        self.terminator = terminator;
        self
    }

    /// Stop after `limit` invalid lines
    pub fn with_max_invalid_lines(mut self, limit: u64) -> Self {
        self.max_invalid_lines = Some(limit);
        self
    }

    /// Enable field extraction during scans
    pub fn with_extraction(mut self) -> Self {
        self.extract_fields = true;
        self
    }

    /// Skip the epoch column when extracting
    pub fn without_epoch(mut self) -> Self {
        self.extract_epoch = false;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_max_error_samples(mut self, samples: usize) -> Self {
        self.max_error_samples = samples;
        self
    }

    /// Set the number of concurrent catalog scans
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check the configuration against the astorb layout
    pub fn validate(&self) -> Result<()> {
        self.validate_for(&RecordSchema::astorb())
    }

    /// Check the configuration against a schema's field layout
    pub fn validate_for(&self, schema: &RecordSchema) -> Result<()> {
        let last_column = schema.max_end_column();
        if self.record_width < last_column.max(1) {
            return Err(Error::configuration(format!(
                "Record width {} is smaller than the last field column {}",
                self.record_width, last_column
            )));
        }

        if self.workers == 0 {
            return Err(Error::configuration("Worker count must be greater than 0"));
        }

        if self.workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Worker count cannot exceed {}",
                MAX_WORKERS
            )));
        }

        if self.progress_interval == 0 {
            return Err(Error::configuration(
                "Progress interval must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        Error::configuration(format!("Invalid value '{}' for {}", value, key))
    })
}

fn parse_env_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "Invalid boolean '{}' for {}",
            value, key
        ))),
    }
}
