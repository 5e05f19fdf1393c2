//! Application constants for the astorb validator
//!
//! This module contains the catalog layout constants, default values,
//! and environment variable names used throughout the validator.

// =============================================================================
// Catalog Layout
// =============================================================================

/// Required record width of an astorb line, in bytes
pub const RECORD_WIDTH: usize = 268;

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "../../astorb/astorb.dat";

/// Column layout of the astorb catalog (1-based, inclusive)
///
/// Taken from the published Lowell Observatory `astorb.dat` description.
/// Ranges that begin on a separator blank (e.g. mean anomaly at 115) are
/// kept as published; surrounding whitespace is trimmed at extraction time.
pub mod columns {
    pub const NUMBER: (usize, usize) = (1, 6);
    pub const IDENTIFIER: (usize, usize) = (7, 26);
    pub const ABSOLUTE_MAGNITUDE: (usize, usize) = (43, 47);
    pub const SLOPE_PARAMETER: (usize, usize) = (49, 53);
    /// Epoch of osculation, `yyyymmdd`
    pub const EPOCH: (usize, usize) = (107, 114);
    pub const MEAN_ANOMALY: (usize, usize) = (115, 125);
    pub const ARGUMENT_OF_PERIHELION: (usize, usize) = (126, 136);
    pub const LONGITUDE_OF_ASCENDING_NODE: (usize, usize) = (137, 147);
    pub const INCLINATION: (usize, usize) = (148, 157);
    pub const ECCENTRICITY: (usize, usize) = (158, 168);
    pub const SEMIMAJOR_AXIS: (usize, usize) = (169, 181);
}

/// Field names used by the astorb schema
pub mod field_names {
    pub const NUMBER: &str = "Number";
    pub const IDENTIFIER: &str = "Identifier";
    pub const ABSOLUTE_MAGNITUDE: &str = "AbsoluteMagnitude";
    pub const SLOPE_PARAMETER: &str = "SlopeParameter";
    pub const EPOCH: &str = "Epoch";
    pub const MEAN_ANOMALY: &str = "MeanAnomaly";
    pub const ARGUMENT_OF_PERIHELION: &str = "ArgumentOfPerihelion";
    pub const LONGITUDE_OF_ASCENDING_NODE: &str = "LongitudeOfAscendingNode";
    pub const INCLINATION: &str = "Inclination";
    pub const ECCENTRICITY: &str = "Eccentricity";
    pub const SEMIMAJOR_AXIS: &str = "SemimajorAxis";
}

// =============================================================================
// Time Reference
// =============================================================================

/// J2000.0 reference instant: 2000-01-01T12:00:00 UTC
pub mod j2000 {
    pub const YEAR: i32 = 2000;
    pub const MONTH: u32 = 1;
    pub const DAY: u32 = 1;
    pub const HOUR: u32 = 12;
}

/// Hour of day at which a catalog calendar date is anchored
pub const EPOCH_ANCHOR_HOUR: u32 = 12;

// =============================================================================
// Scanner Defaults
// =============================================================================

/// Lines between progress callback invocations
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Maximum number of field error messages retained in scan statistics
pub const DEFAULT_MAX_ERROR_SAMPLES: usize = 20;

/// Upper bound on concurrent catalog scans
pub const MAX_WORKERS: usize = 64;

// =============================================================================
// Binary Export
// =============================================================================

/// Number of `f32` values written per asteroid
pub const EXPORT_FLOATS_PER_RECORD: usize = 6;

/// Size in bytes of one exported asteroid
pub const EXPORT_BYTES_PER_RECORD: usize = EXPORT_FLOATS_PER_RECORD * std::mem::size_of::<f32>();

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable names consulted by layered configuration
pub mod env_vars {
    pub const RECORD_WIDTH: &str = "ASTORB_RECORD_WIDTH";
    pub const TERMINATOR: &str = "ASTORB_TERMINATOR";
    pub const MAX_INVALID: &str = "ASTORB_MAX_INVALID";
    pub const EXTRACT_EPOCH: &str = "ASTORB_EXTRACT_EPOCH";
    pub const WORKERS: &str = "ASTORB_WORKERS";
}
