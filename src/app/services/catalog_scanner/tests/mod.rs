//! Test utilities for catalog scanner testing

use crate::app::services::catalog_scanner::CatalogScanner;
use crate::config::ScanConfig;

pub use crate::app::services::test_helpers::{ceres_line, line_of_len, line_with_eccentricity};

// Test modules
mod scanner_tests;

/// Helper to create a scanner with default settings
pub fn default_scanner() -> CatalogScanner {
    CatalogScanner::from_config(&ScanConfig::default()).unwrap()
}

/// Helper to create a scanner that also extracts fields
pub fn extracting_scanner() -> CatalogScanner {
    CatalogScanner::from_config(&ScanConfig::default().with_extraction()).unwrap()
}

/// Join lines into newline-terminated catalog text
pub fn catalog_text(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

/// Five lines where the second and fourth have the wrong width
pub fn mixed_catalog() -> Vec<String> {
    vec![
        ceres_line(),
        line_of_len(267),
        ceres_line(),
        line_of_len(269),
        ceres_line(),
    ]
}
