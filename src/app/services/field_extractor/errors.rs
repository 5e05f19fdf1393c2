//! Field-level parse failures
//!
//! These are recoverable per record: a scan reports them and moves on.

use thiserror::Error;

/// A structurally valid line whose field could not be parsed as its kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedFieldError {
    #[error("field '{field}' is not valid UTF-8")]
    NotText { field: &'static str },

    #[error("field '{field}' ends at column {end_column} but the line has {line_len} bytes")]
    OutOfBounds {
        field: &'static str,
        end_column: usize,
        line_len: usize,
    },

    #[error("field '{field}' is blank")]
    Empty { field: &'static str },

    #[error("field '{field}' is not a real number: '{raw}'")]
    InvalidReal { field: &'static str, raw: String },

    #[error("field '{field}' is not an integer: '{raw}'")]
    InvalidInteger { field: &'static str, raw: String },

    #[error("field '{field}' is not a yyyymmdd date: '{raw}'")]
    InvalidDate { field: &'static str, raw: String },
}

impl MalformedFieldError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            MalformedFieldError::NotText { field }
            | MalformedFieldError::OutOfBounds { field, .. }
            | MalformedFieldError::Empty { field }
            | MalformedFieldError::InvalidReal { field, .. }
            | MalformedFieldError::InvalidInteger { field, .. }
            | MalformedFieldError::InvalidDate { field, .. } => field,
        }
    }
}
