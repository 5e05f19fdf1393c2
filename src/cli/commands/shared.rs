//! Shared components for CLI commands

use crate::Result;
use crate::cli::args::ScanOptions;
use crate::config::ScanConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags. Calling this more
/// than once keeps the first subscriber.
pub fn setup_logging(options: &ScanOptions) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = options.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("astorb_validator={}", log_level)));

    let initialized = if options.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with uptime timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if initialized.is_err() {
        debug!("Logging already initialized");
    } else {
        debug!("Logging initialized at level: {}", log_level);
    }
    Ok(())
}

/// Load configuration using the layered approach (defaults -> env -> args)
pub fn build_config(options: &ScanOptions) -> Result<ScanConfig> {
    build_config_over(ScanConfig::default(), options)
}

/// Layer env and args over command-specific defaults
pub fn build_config_over(defaults: ScanConfig, options: &ScanOptions) -> Result<ScanConfig> {
    let config = options.apply(defaults.apply_env()?);
    config.validate()?;

    debug!("Effective scan configuration: {:?}", config);
    Ok(config)
}

/// Create a spinner for work of unknown length, or `None` when hidden
pub fn create_spinner(show: bool, message: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::record_validator::TerminatorPolicy;

    #[test]
    fn test_build_config_applies_overrides() {
        let options = ScanOptions {
            max_invalid: Some(7),
            workers: Some(2),
            ..ScanOptions::default()
        };

        let config = build_config(&options).unwrap();
        assert_eq!(config.max_invalid_lines, Some(7));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_build_config_rejects_narrow_width() {
        let options = ScanOptions {
            record_width: Some(100),
            ..ScanOptions::default()
        };
        assert!(build_config(&options).is_err());
    }

    #[test]
    fn test_build_config_over_keeps_defaults_unless_overridden() {
        let config =
            build_config_over(ScanConfig::export_defaults(), &ScanOptions::default()).unwrap();
        assert_eq!(config.terminator, TerminatorPolicy::Include);

        let options = ScanOptions {
            terminator: Some(TerminatorPolicy::Strip),
            ..ScanOptions::default()
        };
        let config = build_config_over(ScanConfig::export_defaults(), &options).unwrap();
        assert_eq!(config.terminator, TerminatorPolicy::Strip);
    }

    #[test]
    fn test_spinner_hidden_when_quiet() {
        assert!(create_spinner(false, "scanning").is_none());
    }
}
