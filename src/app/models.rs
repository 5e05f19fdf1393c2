//! Data models for astorb catalog processing
//!
//! This module contains the core data structures for describing fixed-width
//! field layouts and for representing the typed values extracted from an
//! astorb catalog line: epochs, tagged orbital elements and asteroid records.

use crate::app::services::field_extractor::{FieldExtractor, MalformedFieldError};
use crate::app::services::record_validator::RecordValidator;
use crate::constants::{EPOCH_ANCHOR_HOUR, j2000};
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Range;

// =============================================================================
// Field Layout
// =============================================================================

/// How the text of a field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text, trimmed
    Text,
    /// Floating-point value (angles, ratios, distances, magnitudes)
    Real,
    /// Signed integer
    Integer,
    /// Calendar date in `yyyymmdd` form
    Date,
}

/// Physical unit attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Degree,
    AstronomicalUnit,
    Magnitude,
    Day,
    Dimensionless,
}

impl Unit {
    /// Unit symbol as printed in the catalog description (empty if dimensionless)
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Degree => "deg",
            Unit::AstronomicalUnit => "AU",
            Unit::Magnitude => "mag",
            Unit::Day => "d",
            Unit::Dimensionless => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Reference frame an angular element is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFrame {
    J2000,
    None,
}

impl ReferenceFrame {
    /// Frame label (empty if the field carries no frame)
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceFrame::J2000 => "J2000.0",
            ReferenceFrame::None => "",
        }
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One field of a fixed-width record
///
/// Columns are 1-based and inclusive, matching published column tables.
/// The bytes read for a field are `start_column - 1 .. end_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start_column: usize,
    pub end_column: usize,
    pub kind: FieldKind,
    pub unit: Unit,
    pub frame: ReferenceFrame,
}

impl FieldSpec {
    /// Create a field spec from a `(start, end)` column pair
    pub const fn new(
        name: &'static str,
        columns: (usize, usize),
        kind: FieldKind,
        unit: Unit,
        frame: ReferenceFrame,
    ) -> Self {
        Self {
            name,
            start_column: columns.0,
            end_column: columns.1,
            kind,
            unit,
            frame,
        }
    }

    /// Number of characters the field occupies
    pub fn width(&self) -> usize {
        self.end_column + 1 - self.start_column
    }

    /// 0-based half-open byte range of the field within a line
    pub fn byte_range(&self) -> Range<usize> {
        (self.start_column - 1)..self.end_column
    }

    /// Check `1 <= start_column <= end_column <= record_width`
    pub fn validate(&self, record_width: usize) -> Result<()> {
        if self.start_column == 0 {
            return Err(Error::schema(format!(
                "Field '{}' starts at column 0; columns are 1-based",
                self.name
            )));
        }

        if self.start_column > self.end_column {
            return Err(Error::schema(format!(
                "Field '{}' has start column {} after end column {}",
                self.name, self.start_column, self.end_column
            )));
        }

        if self.end_column > record_width {
            return Err(Error::schema(format!(
                "Field '{}' ends at column {} beyond record width {}",
                self.name, self.end_column, record_width
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Epoch
// =============================================================================

/// The J2000.0 reference instant, 2000-01-01T12:00:00 UTC
pub fn j2000_reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(j2000::YEAR, j2000::MONTH, j2000::DAY, j2000::HOUR, 0, 0)
        .single()
        .expect("J2000 reference is a valid UTC instant")
}

/// Epoch of a catalog record expressed relative to J2000.0
///
/// A catalog date carries no time of day; it is anchored at 12:00 UTC so
/// that 2000-01-01 maps to an offset of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Epoch {
    pub calendar_date: NaiveDate,
    pub instant: DateTime<Utc>,
    #[serde(serialize_with = "serialize_offset_seconds")]
    pub offset_from_j2000: Duration,
}

impl Epoch {
    /// Build the epoch for a calendar date
    pub fn from_date(calendar_date: NaiveDate) -> Self {
        let anchor = NaiveTime::from_hms_opt(EPOCH_ANCHOR_HOUR, 0, 0)
            .expect("epoch anchor hour is a valid time of day");
        let instant = Utc.from_utc_datetime(&calendar_date.and_time(anchor));

        Self {
            calendar_date,
            instant,
            offset_from_j2000: instant - j2000_reference(),
        }
    }

    /// Build the epoch from year/month/day components, if they form a valid date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_date)
    }

    /// Signed offset from J2000.0 in days
    pub fn days_since_j2000(&self) -> f64 {
        self.offset_from_j2000.num_seconds() as f64 / 86_400.0
    }
}

fn serialize_offset_seconds<S: Serializer>(
    offset: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(offset.num_seconds())
}

// =============================================================================
// Orbital Elements
// =============================================================================

/// A real value tagged with the unit and frame of the field it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElement {
    pub value: f64,
    pub unit: Unit,
    pub frame: ReferenceFrame,
}

impl OrbitalElement {
    pub fn new(value: f64, spec: &FieldSpec) -> Self {
        Self {
            value,
            unit: spec.unit,
            frame: spec.frame,
        }
    }
}

/// The six osculating elements of one asteroid orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    pub mean_anomaly: OrbitalElement,
    pub argument_of_perihelion: OrbitalElement,
    pub longitude_of_ascending_node: OrbitalElement,
    pub inclination: OrbitalElement,
    pub eccentricity: OrbitalElement,
    pub semimajor_axis: OrbitalElement,
}

impl OrbitalElementSet {
    /// Extract the element set from a raw line
    ///
    /// # Panics
    ///
    /// Panics if `line` does not pass `validator`. Callers must classify the
    /// line first; handing an invalid line to the extractor is a caller bug.
    pub fn from_line(
        validator: &RecordValidator,
        extractor: &FieldExtractor,
        line: &[u8],
    ) -> std::result::Result<Self, MalformedFieldError> {
        let validated = validator.validate(line).unwrap_or_else(|| {
            panic!(
                "invalid astorb line: width {} is not {}",
                validator.measured_len(line),
                validator.record_width()
            )
        });
        extractor.orbital_elements(&validated)
    }

    /// Element values in export order as `f32`
    ///
    /// Order: mean anomaly, argument of perihelion, longitude of ascending
    /// node, inclination, eccentricity, semimajor axis.
    pub fn to_f32_array(&self) -> [f32; 6] {
        [
            self.mean_anomaly.value as f32,
            self.argument_of_perihelion.value as f32,
            self.longitude_of_ascending_node.value as f32,
            self.inclination.value as f32,
            self.eccentricity.value as f32,
            self.semimajor_axis.value as f32,
        ]
    }
}

// =============================================================================
// Asteroid Record
// =============================================================================

/// A fully parsed catalog line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidRecord {
    /// 1-based line number within the catalog
    pub line_number: u64,

    /// Asteroid number (absent for unnumbered objects)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Name or provisional designation
    pub identifier: String,

    /// Absolute magnitude H
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_magnitude: Option<f64>,

    /// Slope parameter G
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_parameter: Option<f64>,

    /// Epoch of osculation (absent when epoch extraction is disabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<Epoch>,

    pub elements: OrbitalElementSet,
}

/// A typed value produced by field extraction
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Real(f64),
    Integer(i64),
    Date(Epoch),
}

impl FieldValue {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            FieldValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_epoch(&self) -> Option<&Epoch> {
        match self {
            FieldValue::Date(epoch) => Some(epoch),
            _ => None,
        }
    }
}
