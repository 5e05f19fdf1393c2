//! Validate command implementation
//!
//! Scans every requested catalog, one blocking task per catalog with at most
//! `workers` running at once, then reports per-catalog and total counts.

use super::shared::{build_config, create_spinner, setup_logging};
use crate::app::services::catalog_scanner::{CatalogScanner, ScanStatistics};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::cli::input::resolve_catalog_paths;
use crate::{Error, Result};
use colored::*;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{HumanDuration, ProgressBar};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Scan result for one catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub path: PathBuf,
    pub statistics: ScanStatistics,
}

/// Validate command runner
pub async fn run_validate(args: ValidateArgs, cancel: Arc<AtomicBool>) -> Result<ScanStatistics> {
    let start_time = Instant::now();

    setup_logging(&args.scan)?;
    debug!("Validation arguments: {:?}", args);
    args.validate()?;

    let mut config = build_config(&args.scan)?;
    if args.extract {
        config = config.with_extraction();
    }

    let paths = resolve_catalog_paths(&args.paths)?;
    let working_directory = std::env::current_dir()
        .map_err(|e| Error::io("Failed to read working directory", e))?;

    info!(
        "Validating {} catalog(s) with {} worker(s)",
        paths.len(),
        config.workers
    );

    let scanner =
        Arc::new(CatalogScanner::from_config(&config)?.with_cancel_flag(Arc::clone(&cancel)));
    let show_progress = args.scan.show_progress() && args.output_format == OutputFormat::Human;
    let spinner = create_spinner(show_progress, "Scanning catalogs...");

    let reports = scan_catalogs(scanner, paths, config.workers, spinner.clone()).await?;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let mut totals = ScanStatistics::with_sample_limit(config.max_error_samples);
    for report in &reports {
        totals.merge(&report.statistics);
    }

    let output = match args.output_format {
        OutputFormat::Human => {
            format_human_report(&working_directory, &reports, &totals, args.extract)
        }
        OutputFormat::Json => format_json_report(&working_directory, &reports, &totals)?,
        OutputFormat::Csv => format_csv_report(&reports, &totals),
    };
    print!("{}", output);

    info!(
        "Validation completed in {}: {}",
        HumanDuration(start_time.elapsed()),
        totals.summary()
    );

    if cancel.load(Ordering::Relaxed) {
        return Err(Error::processing_interrupted("Scan interrupted by user"));
    }

    Ok(totals)
}

/// Scan catalogs concurrently, preserving input order in the results
pub async fn scan_catalogs(
    scanner: Arc<CatalogScanner>,
    paths: Vec<PathBuf>,
    workers: usize,
    progress: Option<ProgressBar>,
) -> Result<Vec<CatalogReport>> {
    let tasks = paths.into_iter().map(|path| {
        let scanner = Arc::clone(&scanner);
        let progress = progress.clone();

        async move {
            let scan_path = path.clone();
            let statistics = tokio::task::spawn_blocking(move || {
                scanner.scan_path_with_progress(&scan_path, |stats| {
                    if let Some(pb) = &progress {
                        pb.set_message(format!(
                            "{}: {} lines",
                            scan_path.display(),
                            stats.line_count
                        ));
                    }
                })
            })
            .await
            .map_err(|e| Error::processing_interrupted(format!("Scan task failed: {}", e)))??;

            Ok::<_, Error>(CatalogReport { path, statistics })
        }
    });

    stream::iter(tasks)
        .buffered(workers.max(1))
        .try_collect()
        .await
}

/// Human-readable report in the catalog tool's line format
pub fn format_human_report(
    working_directory: &Path,
    reports: &[CatalogReport],
    totals: &ScanStatistics,
    extracted: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "working directory: {}", working_directory.display());

    for report in reports {
        let stats = &report.statistics;
        let _ = writeln!(out, "{}: {}", report.path.display(), stats.line_count);
        let _ = writeln!(out, "valid: {}", stats.valid_line_count);
        let _ = writeln!(out, "invalid: {}", stats.invalid_line_count);

        if extracted {
            let _ = writeln!(out, "parsed: {}", stats.parsed_record_count);
            let _ = writeln!(out, "malformed: {}", stats.malformed_record_count);
            for sample in &stats.error_samples {
                let _ = writeln!(out, "  {}", sample.yellow());
            }
        }

        if stats.stopped_early {
            let _ = writeln!(out, "{}", "scan stopped early".bright_yellow().bold());
        }
    }

    if reports.len() > 1 {
        let _ = writeln!(out, "\n{}", "Totals".bright_green().bold());
        let _ = writeln!(out, "catalogs: {}", reports.len());
        let _ = writeln!(out, "lines: {}", totals.line_count);
        let _ = writeln!(out, "valid: {}", totals.valid_line_count);
        let _ = writeln!(out, "invalid: {}", totals.invalid_line_count);
        if extracted {
            let _ = writeln!(out, "parsed: {}", totals.parsed_record_count);
            let _ = writeln!(out, "malformed: {}", totals.malformed_record_count);
        }
    }

    out
}

/// JSON report for scripting
pub fn format_json_report(
    working_directory: &Path,
    reports: &[CatalogReport],
    totals: &ScanStatistics,
) -> Result<String> {
    let report = serde_json::json!({
        "working_directory": working_directory,
        "catalogs": reports,
        "totals": totals,
    });

    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|e| Error::configuration(format!("Failed to serialize scan report: {}", e)))?;
    json.push('\n');
    Ok(json)
}

/// CSV report of total counts as `metric,value` lines
pub fn format_csv_report(reports: &[CatalogReport], totals: &ScanStatistics) -> String {
    let mut out = String::from("metric,value\n");
    let _ = writeln!(out, "catalogs,{}", reports.len());
    let _ = writeln!(out, "line_count,{}", totals.line_count);
    let _ = writeln!(out, "valid_line_count,{}", totals.valid_line_count);
    let _ = writeln!(out, "invalid_line_count,{}", totals.invalid_line_count);
    let _ = writeln!(out, "parsed_record_count,{}", totals.parsed_record_count);
    let _ = writeln!(out, "malformed_record_count,{}", totals.malformed_record_count);
    let _ = writeln!(out, "valid_rate_percent,{:.2}", totals.valid_rate());
    let _ = writeln!(out, "stopped_early,{}", totals.stopped_early);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::test_helpers::{ceres_line, line_of_len};
    use crate::cli::args::ScanOptions;
    use crate::config::ScanConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write_catalog(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
        let path = dir.join(name);
        let text: String = lines.iter().map(|line| format!("{}\n", line)).collect();
        fs::write(&path, text).unwrap();
        path
    }

    fn quiet_args(paths: Vec<String>) -> ValidateArgs {
        ValidateArgs {
            paths,
            extract: true,
            scan: ScanOptions {
                quiet: true,
                ..ScanOptions::default()
            },
            output_format: OutputFormat::Csv,
        }
    }

    fn report(path: &str, valid: u64, invalid: u64) -> CatalogReport {
        let mut statistics = ScanStatistics::new();
        for _ in 0..valid {
            statistics.record_valid();
        }
        for _ in 0..invalid {
            statistics.record_invalid();
        }
        CatalogReport {
            path: PathBuf::from(path),
            statistics,
        }
    }

    #[tokio::test]
    async fn test_scan_catalogs_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_catalog(temp_dir.path(), "a.dat", &[ceres_line(), line_of_len(3)]);
        let second = write_catalog(temp_dir.path(), "b.dat", &[ceres_line()]);

        let scanner = Arc::new(CatalogScanner::from_config(&ScanConfig::default()).unwrap());
        let reports = scan_catalogs(scanner, vec![first.clone(), second.clone()], 2, None)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, first);
        assert_eq!(reports[0].statistics.line_count, 2);
        assert_eq!(reports[1].path, second);
        assert_eq!(reports[1].statistics.valid_line_count, 1);
    }

    #[tokio::test]
    async fn test_scan_catalogs_missing_file_fails() {
        let scanner = Arc::new(CatalogScanner::from_config(&ScanConfig::default()).unwrap());
        let result = scan_catalogs(
            scanner,
            vec![PathBuf::from("/nonexistent/astorb.dat")],
            1,
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_run_validate_merges_totals() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_catalog(temp_dir.path(), "a.dat", &[ceres_line(), line_of_len(3)]);
        let second = write_catalog(temp_dir.path(), "b.dat", &[ceres_line(), ceres_line()]);

        let args = quiet_args(vec![
            first.display().to_string(),
            second.display().to_string(),
        ]);
        let totals = run_validate(args, Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(totals.line_count, 4);
        assert_eq!(totals.valid_line_count, 3);
        assert_eq!(totals.invalid_line_count, 1);
        assert_eq!(totals.parsed_record_count, 3);
    }

    #[tokio::test]
    async fn test_run_validate_cancelled() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(temp_dir.path(), "a.dat", &[ceres_line()]);

        let args = quiet_args(vec![path.display().to_string()]);
        let result = run_validate(args, Arc::new(AtomicBool::new(true))).await;
        assert!(matches!(result, Err(Error::ProcessingInterrupted { .. })));
    }

    #[test]
    fn test_human_report_lines() {
        let reports = vec![report("astorb.dat", 3, 2)];
        let totals = reports[0].statistics.clone();

        let text = format_human_report(Path::new("/work"), &reports, &totals, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "working directory: /work",
                "astorb.dat: 5",
                "valid: 3",
                "invalid: 2"
            ]
        );
    }

    #[test]
    fn test_human_report_totals_for_several_catalogs() {
        let reports = vec![report("a.dat", 1, 0), report("b.dat", 2, 1)];
        let mut totals = ScanStatistics::new();
        for r in &reports {
            totals.merge(&r.statistics);
        }

        let text = format_human_report(Path::new("/work"), &reports, &totals, false);
        assert!(text.contains("catalogs: 2"));
        assert!(text.contains("lines: 4"));
    }

    #[test]
    fn test_csv_report() {
        let reports = vec![report("a.dat", 3, 2)];
        let text = format_csv_report(&reports, &reports[0].statistics);

        assert!(text.starts_with("metric,value\n"));
        assert!(text.contains("line_count,5\n"));
        assert!(text.contains("invalid_line_count,2\n"));
        assert!(text.contains("valid_rate_percent,60.00\n"));
    }

    #[test]
    fn test_json_report() {
        let reports = vec![report("a.dat", 1, 1)];
        let text =
            format_json_report(Path::new("/work"), &reports, &reports[0].statistics).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["working_directory"], "/work");
        assert_eq!(value["catalogs"][0]["path"], "a.dat");
        assert_eq!(value["totals"]["line_count"], 2);
    }
}
