//! Command-line argument definitions for the astorb validator
//!
//! This module defines the CLI interface using the clap derive API. Scan
//! settings shared by every subcommand live in [`ScanOptions`] and are
//! applied on top of the layered [`ScanConfig`].

use crate::app::services::record_validator::TerminatorPolicy;
use crate::config::ScanConfig;
use crate::constants::MAX_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the astorb catalog validator
///
/// Validates the fixed-width Lowell Observatory `astorb.dat` asteroid
/// catalog line by line and exports its orbital elements.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "astorb-validator",
    version,
    about = "Validate and parse the Lowell Observatory astorb asteroid catalog",
    long_about = "Streams one or more astorb.dat catalogs, classifying every line as \
                  structurally valid or invalid by its fixed record width, and optionally \
                  extracts the typed orbital elements of each valid record. The export \
                  subcommand writes those elements as packed little-endian floats."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Count valid and invalid catalog lines (default command)
    Validate(ValidateArgs),
    /// Write orbital elements as packed binary floats
    Export(ExportArgs),
}

/// Scan settings shared by all subcommands
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanOptions {
    /// How a trailing line terminator counts towards the record width
    ///
    /// `strip` removes a trailing newline (and carriage return) before
    /// measuring; `include` measures the raw line, newline included.
    /// `validate` defaults to `strip`, `export` to `include`.
    #[arg(
        long = "terminator",
        value_name = "POLICY",
        help = "Terminator policy: strip or include (default: strip for validate, include for export)"
    )]
    pub terminator: Option<TerminatorPolicy>,

    /// Exact record width in bytes
    #[arg(
        long = "record-width",
        value_name = "BYTES",
        help = "Exact record width every line must have"
    )]
    pub record_width: Option<usize>,

    /// Stop each scan after this many invalid lines
    #[arg(
        long = "max-invalid",
        value_name = "COUNT",
        help = "Stop scanning a catalog after this many invalid lines"
    )]
    pub max_invalid: Option<u64>,

    /// Do not parse the epoch column
    #[arg(long = "no-epoch", help = "Skip the epoch column when extracting")]
    pub no_epoch: bool,

    /// Number of catalogs scanned concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of catalogs scanned concurrently (default: CPU count)"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress progress and log output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Catalog files or glob patterns
    ///
    /// Defaults to ../../astorb/astorb.dat when omitted.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Also extract fields and report parsed/malformed record counts
    #[arg(
        long = "extract",
        help = "Extract fields from valid lines and count malformed records"
    )]
    pub extract: bool,

    #[command(flatten)]
    pub scan: ScanOptions,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Catalog to read
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Path to astorb.dat"
    )]
    pub input: PathBuf,

    /// Binary file to write
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path to the output file"
    )]
    pub output: PathBuf,

    #[command(flatten)]
    pub scan: ScanOptions,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// The requested command, falling back to `validate` with defaults
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Validate(ValidateArgs::default()))
    }
}

impl ScanOptions {
    /// Apply command-line overrides on top of a layered configuration
    pub fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(terminator) = self.terminator {
            config = config.with_terminator(terminator);
        }
        if let Some(width) = self.record_width {
            config = config.with_record_width(width);
        }
        if let Some(limit) = self.max_invalid {
            config = config.with_max_invalid_lines(limit);
        }
        if self.no_epoch {
            config = config.without_epoch();
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }

    /// Validate the scan options for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > MAX_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_WORKERS
                )));
            }
        }

        if self.record_width == Some(0) {
            return Err(Error::configuration(
                "Record width must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ValidateArgs {
    /// Validate the validate command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        self.scan.validate()
    }
}

impl ExportArgs {
    /// Validate the export command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        self.scan.validate()?;

        if self.input == self.output {
            return Err(Error::configuration(
                "Input and output paths must differ",
            ));
        }

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::configuration(format!(
                    "Output file directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            extract: false,
            scan: ScanOptions::default(),
            output_format: OutputFormat::Human,
        }
    }
}
