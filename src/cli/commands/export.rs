//! Export command implementation
//!
//! Converts a catalog into the packed binary element file read by the
//! visualisation front end.

use super::shared::{build_config_over, create_spinner, setup_logging};
use crate::app::services::binary_export::{ExportSummary, export_path};
use crate::app::services::catalog_scanner::{CatalogScanner, ScanStatistics};
use crate::cli::args::ExportArgs;
use crate::config::ScanConfig;
use crate::{Error, Result};
use colored::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Export command runner
pub async fn run_export(args: ExportArgs, cancel: Arc<AtomicBool>) -> Result<ScanStatistics> {
    setup_logging(&args.scan)?;
    debug!("Export arguments: {:?}", args);
    args.validate()?;

    let config = build_config_over(ScanConfig::export_defaults(), &args.scan)?;
    let scanner = CatalogScanner::from_config(&config)?.with_cancel_flag(Arc::clone(&cancel));

    let spinner = create_spinner(
        args.scan.show_progress(),
        &format!("Exporting {}...", args.input.display()),
    );

    let input = args.input.clone();
    let output = args.output.clone();
    let summary = tokio::task::spawn_blocking(move || export_path(&scanner, &input, &output))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Export task failed: {}", e)))??;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    if cancel.load(Ordering::Relaxed) {
        return Err(Error::processing_interrupted(format!(
            "Export interrupted by user; {} is incomplete",
            args.output.display()
        )));
    }

    print!("{}", format_export_report(&args, &summary));
    info!("{}", summary.statistics.summary());

    Ok(summary.statistics)
}

/// Summary in the export tool's line format
pub fn format_export_report(args: &ExportArgs, summary: &ExportSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("asteroid count = {}\n", summary.asteroid_count));

    match summary.average_eccentricity {
        Some(average) => out.push_str(&format!("average eccentricity = {:.5}\n", average)),
        None => out.push_str("average eccentricity = n/a\n"),
    }

    let skipped = summary.statistics.invalid_line_count + summary.statistics.malformed_record_count;
    if skipped > 0 {
        out.push_str(&format!(
            "{}\n",
            format!("skipped {} unparseable line(s)", skipped).yellow()
        ));
    }

    if summary.statistics.stopped_early {
        out.push_str(&format!(
            "{}\n",
            "export stopped early; output is partial"
                .bright_yellow()
                .bold()
        ));
    }

    out.push_str(&format!(
        "wrote {} bytes to {}\n",
        summary.bytes_written,
        args.output.display()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::record_validator::TerminatorPolicy;
    use crate::app::services::test_helpers::{ceres_builder, ceres_line, line_with_eccentricity};
    use crate::cli::args::ScanOptions;
    use crate::constants::columns;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_export_args(dir: &std::path::Path) -> ExportArgs {
        ExportArgs {
            input: dir.join("astorb.dat"),
            output: dir.join("astorb.bin"),
            scan: ScanOptions {
                quiet: true,
                ..ScanOptions::default()
            },
        }
    }

    /// Published layout: 267 content bytes plus LF
    fn published_line(eccentricity: &str) -> String {
        ceres_builder(267)
            .put(columns::ECCENTRICITY, eccentricity)
            .build()
    }

    #[tokio::test]
    async fn test_run_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = quiet_export_args(temp_dir.path());
        let text = format!(
            "{}\n{}\n{}\n",
            published_line("0.07996337"),
            published_line("0.5"),
            "short"
        );
        fs::write(&args.input, text).unwrap();

        let stats = run_export(args.clone(), Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(stats.parsed_record_count, 2);
        assert_eq!(stats.invalid_line_count, 1);
        assert_eq!(fs::metadata(&args.output).unwrap().len(), 48);
    }

    #[tokio::test]
    async fn test_run_export_defaults_accept_published_layout() {
        let temp_dir = TempDir::new().unwrap();
        let args = quiet_export_args(temp_dir.path());
        let text: String = (0..3).map(|_| format!("{}\n", published_line("0.1"))).collect();
        fs::write(&args.input, text).unwrap();

        let stats = run_export(args.clone(), Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(stats.valid_line_count, 3);
        assert_eq!(stats.parsed_record_count, 3);
        assert_eq!(fs::metadata(&args.output).unwrap().len(), 72);
    }

    #[tokio::test]
    async fn test_run_export_strip_terminator_override() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = quiet_export_args(temp_dir.path());
        args.scan.terminator = Some(TerminatorPolicy::Strip);
        let text = format!(
            "{}\n{}\n",
            ceres_line(),
            line_with_eccentricity("0.5")
        );
        fs::write(&args.input, text).unwrap();

        let stats = run_export(args.clone(), Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(stats.parsed_record_count, 2);
        assert_eq!(fs::metadata(&args.output).unwrap().len(), 48);
    }

    #[tokio::test]
    async fn test_run_export_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let args = quiet_export_args(temp_dir.path());

        let result = run_export(args, Arc::new(AtomicBool::new(false))).await;
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[test]
    fn test_export_report_format() {
        let temp_dir = TempDir::new().unwrap();
        let args = quiet_export_args(temp_dir.path());
        let summary = ExportSummary {
            asteroid_count: 2,
            average_eccentricity: Some(0.289981685),
            bytes_written: 48,
            statistics: ScanStatistics::new(),
        };

        let text = format_export_report(&args, &summary);
        assert!(text.contains("asteroid count = 2\n"));
        assert!(text.contains("average eccentricity = 0.28998\n"));
        assert!(text.contains("wrote 48 bytes"));
        assert!(!text.contains("stopped early"));
    }

    #[test]
    fn test_export_report_flags_early_stop() {
        let temp_dir = TempDir::new().unwrap();
        let args = quiet_export_args(temp_dir.path());
        let mut statistics = ScanStatistics::new();
        statistics.record_invalid();
        statistics.stopped_early = true;
        let summary = ExportSummary {
            asteroid_count: 0,
            average_eccentricity: None,
            bytes_written: 0,
            statistics,
        };

        let text = format_export_report(&args, &summary);
        assert!(text.contains("export stopped early; output is partial"));
        assert!(text.contains("wrote 0 bytes"));
    }
}
