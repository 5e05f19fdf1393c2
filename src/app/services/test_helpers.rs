//! Shared helpers for building fixed-width catalog lines in tests

use crate::constants::{RECORD_WIDTH, columns};

/// Builds a fixed-width line by writing text into 1-based column ranges
#[derive(Debug, Clone)]
pub struct LineBuilder {
    bytes: Vec<u8>,
}

impl LineBuilder {
    /// A line of `width` spaces
    pub fn blank(width: usize) -> Self {
        Self {
            bytes: vec![b' '; width],
        }
    }

    /// Write `text` right-aligned within `columns` (Fortran `F`/`I` style)
    /// over a blanked range.
    pub fn put(mut self, columns: (usize, usize), text: &str) -> Self {
        let (start, end) = columns;
        assert!(text.len() <= end + 1 - start, "'{}' does not fit {:?}", text, columns);
        self.bytes[start - 1..end].fill(b' ');
        let offset = end - text.len();
        self.bytes[offset..end].copy_from_slice(text.as_bytes());
        self
    }

    /// Write `text` left-aligned starting at column `start`
    pub fn put_left(mut self, start: usize, text: &str) -> Self {
        let offset = start - 1;
        self.bytes[offset..offset + text.len()].copy_from_slice(text.as_bytes());
        self
    }

    pub fn build(self) -> String {
        String::from_utf8(self.bytes).unwrap()
    }
}

/// Columns of (1) Ceres written into a line of the given width
pub fn ceres_builder(width: usize) -> LineBuilder {
    LineBuilder::blank(width)
        .put(columns::NUMBER, "1")
        .put_left(8, "Ceres")
        .put(columns::ABSOLUTE_MAGNITUDE, "3.34")
        .put(columns::SLOPE_PARAMETER, "0.12")
        .put(columns::EPOCH, "20051230")
        .put(columns::MEAN_ANOMALY, "160.417131")
        .put(columns::ARGUMENT_OF_PERIHELION, "73.126332")
        .put(columns::LONGITUDE_OF_ASCENDING_NODE, "80.528681")
        .put(columns::INCLINATION, "10.584073")
        .put(columns::ECCENTRICITY, "0.07996337")
        .put(columns::SEMIMAJOR_AXIS, "2.76544200")
}

/// A complete, valid 268-byte line for (1) Ceres
pub fn ceres_line() -> String {
    ceres_builder(RECORD_WIDTH).build()
}

/// A valid-width Ceres line with the eccentricity column replaced
pub fn line_with_eccentricity(text: &str) -> String {
    ceres_builder(RECORD_WIDTH)
        .put(columns::ECCENTRICITY, text)
        .build()
}

/// A line of exactly `len` filler bytes
pub fn line_of_len(len: usize) -> String {
    "x".repeat(len)
}
