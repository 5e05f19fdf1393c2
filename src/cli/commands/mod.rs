//! Command implementations for the astorb validator CLI
//!
//! Each subcommand lives in its own module; shared logging, configuration
//! and progress helpers are in `shared`.

pub mod export;
pub mod shared;
pub mod validate;

use crate::Result;
use crate::app::services::catalog_scanner::ScanStatistics;
use crate::cli::args::{Args, Commands};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Main command runner
///
/// Dispatches to the requested subcommand, running `validate` with default
/// arguments when none was given. `cancel` is set by the binary on Ctrl-C
/// and stops scans at the next line.
pub async fn run(args: Args, cancel: Arc<AtomicBool>) -> Result<ScanStatistics> {
    match args.command_or_default() {
        Commands::Validate(validate_args) => validate::run_validate(validate_args, cancel).await,
        Commands::Export(export_args) => export::run_export(export_args, cancel).await,
    }
}
