//! Tests for the streaming scan pass

use super::*;
use crate::Error;
use crate::app::services::record_schema::RecordSchema;
use crate::app::services::record_validator::TerminatorPolicy;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn test_scan_mixed_widths() {
    let scanner = default_scanner();
    let text = catalog_text(&mixed_catalog());

    let stats = scanner.scan(Cursor::new(text)).unwrap();
    assert_eq!(stats.line_count, 5);
    assert_eq!(stats.valid_line_count, 3);
    assert_eq!(stats.invalid_line_count, 2);
    assert!(stats.is_consistent());
    assert!(!stats.stopped_early);
}

#[test]
fn test_scan_lines_mixed_widths() {
    let scanner = default_scanner();
    let stats = scanner.scan_lines(mixed_catalog());

    assert_eq!(stats.line_count, 5);
    assert_eq!(stats.valid_line_count, 3);
    assert_eq!(stats.invalid_line_count, 2);
}

#[test]
fn test_scan_empty_source() {
    let scanner = default_scanner();

    let stats = scanner.scan(Cursor::new(Vec::new())).unwrap();
    assert_eq!(stats.line_count, 0);
    assert_eq!(stats.valid_line_count, 0);
    assert_eq!(stats.invalid_line_count, 0);
    assert!(stats.is_consistent());
}

#[test]
fn test_scan_crlf_and_missing_final_newline() {
    let scanner = default_scanner();
    let text = format!("{}\r\n{}\r\n{}", ceres_line(), line_of_len(10), ceres_line());

    let stats = scanner.scan(Cursor::new(text)).unwrap();
    assert_eq!(stats.line_count, 3);
    assert_eq!(stats.valid_line_count, 2);
}

#[test]
fn test_blank_lines_are_invalid() {
    let scanner = default_scanner();
    let text = format!("\n{}\n\n", ceres_line());

    let stats = scanner.scan(Cursor::new(text)).unwrap();
    assert_eq!(stats.line_count, 3);
    assert_eq!(stats.invalid_line_count, 2);
}

#[test]
fn test_include_policy_scan() {
    let config = ScanConfig::default().with_terminator(TerminatorPolicy::Include);
    let scanner = CatalogScanner::from_config(&config).unwrap();
    let text = format!("{}\n{}\n", line_of_len(267), line_of_len(268));

    let stats = scanner.scan(Cursor::new(text)).unwrap();
    assert_eq!(stats.valid_line_count, 1);
    assert_eq!(stats.invalid_line_count, 1);
}

#[test]
fn test_non_utf8_lines_are_counted() {
    let scanner = extracting_scanner();
    let mut bytes = ceres_line().into_bytes();
    bytes[160] = 0xFF;
    bytes.push(b'\n');
    bytes.extend_from_slice(&[0xC3, 0x28, b'\n']);

    let stats = scanner.scan(Cursor::new(bytes)).unwrap();
    assert_eq!(stats.line_count, 2);
    assert_eq!(stats.valid_line_count, 1);
    assert_eq!(stats.malformed_record_count, 1);
    assert_eq!(stats.parsed_record_count, 0);
}

#[test]
fn test_scan_with_extraction_counts_malformed() {
    let scanner = extracting_scanner();
    let lines = vec![
        ceres_line(),
        line_with_eccentricity("abcdefghijk"),
        line_of_len(12),
        " ".repeat(268),
    ];

    let stats = scanner.scan(Cursor::new(catalog_text(&lines))).unwrap();
    assert_eq!(stats.valid_line_count, 3);
    assert_eq!(stats.invalid_line_count, 1);
    assert_eq!(stats.parsed_record_count, 1);
    assert_eq!(stats.malformed_record_count, 2);
    assert_eq!(stats.error_samples.len(), 2);
    assert!(stats.error_samples[0].starts_with("line 2:"));
}

#[test]
fn test_scan_without_extraction_skips_parsing() {
    let scanner = default_scanner();
    let lines = vec![line_with_eccentricity("abcdefghijk")];

    let stats = scanner.scan_lines(lines);
    assert_eq!(stats.valid_line_count, 1);
    assert_eq!(stats.parsed_record_count, 0);
    assert_eq!(stats.malformed_record_count, 0);
}

#[test]
fn test_error_samples_are_capped() {
    let config = ScanConfig::default()
        .with_extraction()
        .with_max_error_samples(2);
    let scanner = CatalogScanner::from_config(&config).unwrap();
    let lines = vec![line_with_eccentricity("bad"); 5];

    let stats = scanner.scan_lines(lines);
    assert_eq!(stats.malformed_record_count, 5);
    assert_eq!(stats.error_samples.len(), 2);
}

#[test]
fn test_stop_after_invalid_limit() {
    let config = ScanConfig::default().with_max_invalid_lines(1);
    let scanner = CatalogScanner::from_config(&config).unwrap();

    let stats = scanner
        .scan(Cursor::new(catalog_text(&mixed_catalog())))
        .unwrap();
    assert_eq!(stats.line_count, 2);
    assert_eq!(stats.invalid_line_count, 1);
    assert!(stats.stopped_early);
    assert!(stats.is_consistent());
}

#[test]
fn test_cancelled_scan_stops_early() {
    let flag = Arc::new(AtomicBool::new(true));
    let scanner = default_scanner().with_cancel_flag(flag.clone());

    let stats = scanner
        .scan(Cursor::new(catalog_text(&mixed_catalog())))
        .unwrap();
    assert_eq!(stats.line_count, 0);
    assert!(stats.stopped_early);

    flag.store(false, Ordering::Relaxed);
    let stats = scanner
        .scan(Cursor::new(catalog_text(&mixed_catalog())))
        .unwrap();
    assert_eq!(stats.line_count, 5);
    assert!(!stats.stopped_early);
}

#[test]
fn test_progress_callback_reports_running_counts() {
    let config = ScanConfig::default().with_progress_interval(2);
    let scanner = CatalogScanner::from_config(&config).unwrap();
    let mut seen = Vec::new();

    let stats = scanner
        .scan_with_progress(Cursor::new(catalog_text(&mixed_catalog())), |s| {
            seen.push(s.line_count)
        })
        .unwrap();

    assert_eq!(seen, vec![2, 4, 5]);
    assert_eq!(stats.line_count, 5);
}

/// Reader that yields one line and then fails
struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::other("disk went away"));
        }
        self.served = true;
        let line = format!("{}\n", ceres_line());
        buf[..line.len()].copy_from_slice(line.as_bytes());
        Ok(line.len())
    }
}

#[test]
fn test_read_error_mid_stream_aborts() {
    let scanner = default_scanner();
    let reader: Box<dyn BufRead> =
        Box::new(BufReader::with_capacity(4096, FailingReader { served: false }));

    let result = scanner.scan(reader);
    match result {
        Err(Error::Io { message, .. }) => assert!(message.contains("line 2")),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_scan_path_missing_file() {
    let scanner = default_scanner();
    let result = scanner.scan_path(std::path::Path::new("/nonexistent/astorb.dat"));
    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
}

#[test]
fn test_new_rejects_width_mismatch() {
    let schema = Arc::new(RecordSchema::astorb());
    let config = ScanConfig::default().with_record_width(267);
    assert!(matches!(
        CatalogScanner::new(schema, &config),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_custom_record_width() {
    let config = ScanConfig::default().with_record_width(200);
    let scanner = CatalogScanner::from_config(&config).unwrap();
    assert_eq!(scanner.schema().record_width(), 200);

    let stats = scanner.scan_lines([line_of_len(200), line_of_len(268)]);
    assert_eq!(stats.valid_line_count, 1);
}

#[test]
fn test_scanner_shared_across_threads() {
    let scanner = Arc::new(default_scanner());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scanner = Arc::clone(&scanner);
            std::thread::spawn(move || scanner.scan_lines(mixed_catalog()))
        })
        .collect();

    let mut total = crate::app::services::catalog_scanner::ScanStatistics::new();
    for handle in handles {
        total.merge(&handle.join().unwrap());
    }
    assert_eq!(total.line_count, 20);
    assert_eq!(total.valid_line_count, 12);
    assert_eq!(total.invalid_line_count, 8);
}
