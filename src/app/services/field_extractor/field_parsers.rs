//! Field parsing utilities for fixed-width records
//!
//! This module provides helper functions for parsing the trimmed text of a
//! single field into a typed value with proper error reporting.

use super::errors::MalformedFieldError;
use crate::app::models::Epoch;
use regex::Regex;
use std::sync::LazyLock;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("date pattern compiles"));

/// Decode field bytes as UTF-8 and trim surrounding whitespace
pub fn field_text<'a>(
    field: &'static str,
    bytes: &'a [u8],
) -> Result<&'a str, MalformedFieldError> {
    std::str::from_utf8(bytes)
        .map(str::trim)
        .map_err(|_| MalformedFieldError::NotText { field })
}

/// Parse a required finite real number
pub fn parse_real(field: &'static str, text: &str) -> Result<f64, MalformedFieldError> {
    let trimmed = require_non_empty(field, text)?;

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MalformedFieldError::InvalidReal {
            field,
            raw: trimmed.to_string(),
        }),
    }
}

/// Parse a real number that may legitimately be blank
pub fn parse_optional_real(
    field: &'static str,
    text: &str,
) -> Result<Option<f64>, MalformedFieldError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_real(field, text).map(Some)
}

/// Parse a required signed integer
pub fn parse_integer(field: &'static str, text: &str) -> Result<i64, MalformedFieldError> {
    let trimmed = require_non_empty(field, text)?;

    trimmed
        .parse::<i64>()
        .map_err(|_| MalformedFieldError::InvalidInteger {
            field,
            raw: trimmed.to_string(),
        })
}

/// Parse an integer that may legitimately be blank
pub fn parse_optional_integer(
    field: &'static str,
    text: &str,
) -> Result<Option<i64>, MalformedFieldError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_integer(field, text).map(Some)
}

/// Parse a `yyyymmdd` calendar date into an [`Epoch`]
pub fn parse_date(field: &'static str, text: &str) -> Result<Epoch, MalformedFieldError> {
    let trimmed = require_non_empty(field, text)?;
    let invalid = || MalformedFieldError::InvalidDate {
        field,
        raw: trimmed.to_string(),
    };

    let captures = DATE_PATTERN.captures(trimmed).ok_or_else(invalid)?;
    let year: i32 = captures[1].parse().map_err(|_| invalid())?;
    let month: u32 = captures[2].parse().map_err(|_| invalid())?;
    let day: u32 = captures[3].parse().map_err(|_| invalid())?;

    Epoch::from_ymd(year, month, day).ok_or_else(invalid)
}

fn require_non_empty<'a>(field: &'static str, text: &'a str) -> Result<&'a str, MalformedFieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MalformedFieldError::Empty { field });
    }
    Ok(trimmed)
}
