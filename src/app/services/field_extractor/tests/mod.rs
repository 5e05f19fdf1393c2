//! Test utilities for field extraction testing
//!
//! This module wires the shared line builders into the extractor tests.

use crate::app::services::field_extractor::FieldExtractor;
use crate::app::services::record_schema::RecordSchema;
use crate::app::services::record_validator::RecordValidator;

pub use crate::app::services::test_helpers::{
    LineBuilder, ceres_line, line_of_len, line_with_eccentricity,
};


/// Helper to create the default astorb extractor
pub fn astorb_extractor() -> FieldExtractor {
    FieldExtractor::new(&RecordSchema::astorb()).unwrap()
}

/// Helper to create the default 268-byte validator
pub fn astorb_validator() -> RecordValidator {
    RecordValidator::default()
}
