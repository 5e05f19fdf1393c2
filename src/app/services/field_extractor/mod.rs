//! Typed field extraction from validated fixed-width lines
//!
//! This module turns the byte range declared by a [`FieldSpec`] into a typed
//! value. Extraction only accepts a [`ValidatedLine`], so the "validate
//! before extracting" precondition is enforced by the type system; content
//! problems are reported as [`MalformedFieldError`] values.
//!
//! ## Architecture
//!
//! - [`extractor`] - Slicing, per-kind dispatch and astorb record assembly
//! - [`field_parsers`] - Pure string parsers for reals, integers and dates
//! - [`errors`] - The recoverable field-level error type
//!
//! [`FieldSpec`]: crate::app::models::FieldSpec
//! [`ValidatedLine`]: crate::app::services::record_validator::ValidatedLine

pub mod errors;
pub mod extractor;
pub mod field_parsers;

#[cfg(test)]
pub mod tests;

pub use errors::MalformedFieldError;
pub use extractor::FieldExtractor;
