//! astorb catalog validator library
//!
//! A Rust library for validating and parsing the Lowell Observatory `astorb.dat`
//! asteroid orbital-elements catalog, a fixed-width text file with one minor
//! planet per line.
//!
//! This library provides tools for:
//! - Describing positional fixed-width layouts as a declarative field schema
//! - Classifying raw lines as structurally valid or invalid by record width
//! - Extracting typed values (angles, ratios, distances, epochs) from columns
//! - Streaming a catalog once with O(1) memory while accumulating statistics
//! - Exporting orbital elements as packed binary floats for visualisation

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod binary_export;
        pub mod catalog_scanner;
        pub mod field_extractor;
        pub mod record_schema;
        pub mod record_validator;

        #[cfg(test)]
        pub mod test_helpers;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{AsteroidRecord, Epoch, FieldSpec, OrbitalElementSet};
pub use app::services::catalog_scanner::{CatalogScanner, ScanStatistics};
pub use app::services::field_extractor::{FieldExtractor, MalformedFieldError};
pub use app::services::record_schema::RecordSchema;
pub use app::services::record_validator::{RecordValidator, TerminatorPolicy, ValidatedLine};
pub use config::ScanConfig;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for catalog validation and parsing
///
/// Structural invalidity (a line of the wrong width) is deliberately absent:
/// it is a counted outcome of a scan, not a failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The catalog could not be opened at all; scanning never starts
    #[error("Catalog source unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed after the source was opened
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A structurally valid line whose field failed to parse
    #[error("Malformed field: {0}")]
    MalformedField(#[from] MalformedFieldError),

    /// Field layout definition violates the schema invariants
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create a source unavailable error for a catalog path
    pub fn source_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
