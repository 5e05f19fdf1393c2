//! Declarative field layout for fixed-width records
//!
//! A [`RecordSchema`] is an ordered list of [`FieldSpec`]s plus the exact
//! width every record must have. The astorb layout is built once with
//! [`RecordSchema::astorb`] and shared read-only by the validator, the
//! extractor and the scanner.

use crate::app::models::{FieldKind, FieldSpec, ReferenceFrame, Unit};
use crate::constants::{RECORD_WIDTH, columns, field_names};
use crate::{Error, Result};
use std::collections::HashSet;

/// Field table of the astorb catalog, in column order
const ASTORB_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        field_names::NUMBER,
        columns::NUMBER,
        FieldKind::Integer,
        Unit::Dimensionless,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::IDENTIFIER,
        columns::IDENTIFIER,
        FieldKind::Text,
        Unit::Dimensionless,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::ABSOLUTE_MAGNITUDE,
        columns::ABSOLUTE_MAGNITUDE,
        FieldKind::Real,
        Unit::Magnitude,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::SLOPE_PARAMETER,
        columns::SLOPE_PARAMETER,
        FieldKind::Real,
        Unit::Dimensionless,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::EPOCH,
        columns::EPOCH,
        FieldKind::Date,
        Unit::Dimensionless,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::MEAN_ANOMALY,
        columns::MEAN_ANOMALY,
        FieldKind::Real,
        Unit::Degree,
        ReferenceFrame::J2000,
    ),
    FieldSpec::new(
        field_names::ARGUMENT_OF_PERIHELION,
        columns::ARGUMENT_OF_PERIHELION,
        FieldKind::Real,
        Unit::Degree,
        ReferenceFrame::J2000,
    ),
    FieldSpec::new(
        field_names::LONGITUDE_OF_ASCENDING_NODE,
        columns::LONGITUDE_OF_ASCENDING_NODE,
        FieldKind::Real,
        Unit::Degree,
        ReferenceFrame::J2000,
    ),
    FieldSpec::new(
        field_names::INCLINATION,
        columns::INCLINATION,
        FieldKind::Real,
        Unit::Degree,
        ReferenceFrame::J2000,
    ),
    FieldSpec::new(
        field_names::ECCENTRICITY,
        columns::ECCENTRICITY,
        FieldKind::Real,
        Unit::Dimensionless,
        ReferenceFrame::None,
    ),
    FieldSpec::new(
        field_names::SEMIMAJOR_AXIS,
        columns::SEMIMAJOR_AXIS,
        FieldKind::Real,
        Unit::AstronomicalUnit,
        ReferenceFrame::None,
    ),
];

/// Ordered field layout plus the required record width
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    record_width: usize,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Create a schema, checking every field against the record width
    ///
    /// Field names must be unique so that lookups by name are unambiguous.
    pub fn new(record_width: usize, fields: Vec<FieldSpec>) -> Result<Self> {
        if record_width == 0 {
            return Err(Error::schema("Record width must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            field.validate(record_width)?;
            if !seen.insert(field.name) {
                return Err(Error::schema(format!(
                    "Duplicate field name '{}'",
                    field.name
                )));
            }
        }

        Ok(Self {
            record_width,
            fields,
        })
    }

    /// The astorb catalog layout with its 268-byte record width
    pub fn astorb() -> Self {
        Self {
            record_width: RECORD_WIDTH,
            fields: ASTORB_FIELDS.to_vec(),
        }
    }

    /// Same layout with a different record width
    pub fn with_record_width(self, record_width: usize) -> Result<Self> {
        Self::new(record_width, self.fields)
    }

    pub fn record_width(&self) -> usize {
        self.record_width
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a field that the caller requires to be present
    pub fn require_field(&self, name: &str) -> Result<FieldSpec> {
        self.field(name)
            .copied()
            .ok_or_else(|| Error::schema(format!("Schema has no field named '{}'", name)))
    }

    /// Highest end column of any field (0 for an empty schema)
    pub fn max_end_column(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.end_column)
            .max()
            .unwrap_or(0)
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::astorb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_astorb_schema_is_consistent() {
        let schema = RecordSchema::astorb();
        let rebuilt = RecordSchema::new(schema.record_width(), schema.fields().to_vec()).unwrap();
        assert_eq!(rebuilt, schema);
        assert_eq!(schema.record_width(), 268);
    }

    #[test]
    fn test_astorb_schema_covers_required_fields() {
        let schema = RecordSchema::astorb();
        for name in [
            "Identifier",
            "MeanAnomaly",
            "ArgumentOfPerihelion",
            "LongitudeOfAscendingNode",
            "Inclination",
            "Eccentricity",
            "SemimajorAxis",
        ] {
            assert!(schema.field(name).is_some(), "missing field {}", name);
        }
    }

    #[test]
    fn test_astorb_published_columns() {
        let schema = RecordSchema::astorb();

        let identifier = schema.field("Identifier").unwrap();
        assert_eq!((identifier.start_column, identifier.end_column), (7, 26));

        let mean_anomaly = schema.field("MeanAnomaly").unwrap();
        assert_eq!((mean_anomaly.start_column, mean_anomaly.end_column), (115, 125));
        assert_eq!(mean_anomaly.unit.symbol(), "deg");
        assert_eq!(mean_anomaly.frame.label(), "J2000.0");

        let inclination = schema.field("Inclination").unwrap();
        assert_eq!(inclination.width(), 10);

        let semimajor_axis = schema.field("SemimajorAxis").unwrap();
        assert_eq!((semimajor_axis.start_column, semimajor_axis.end_column), (169, 181));
        assert_eq!(semimajor_axis.unit.symbol(), "AU");
        assert_eq!(semimajor_axis.frame.label(), "");
    }

    #[test]
    fn test_fields_are_in_column_order() {
        let schema = RecordSchema::astorb();
        let starts: Vec<usize> = schema.fields().iter().map(|f| f.start_column).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(schema.max_end_column(), 181);
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let field = RecordSchema::astorb().require_field("Eccentricity").unwrap();
        let result = RecordSchema::new(268, vec![field, field]);
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn test_new_rejects_field_past_width() {
        let schema = RecordSchema::astorb();
        assert!(schema.clone().with_record_width(181).is_ok());
        assert!(matches!(
            schema.with_record_width(180),
            Err(Error::Schema { .. })
        ));
    }

    #[test]
    fn test_new_rejects_zero_width() {
        assert!(RecordSchema::new(0, Vec::new()).is_err());
    }

    #[test]
    fn test_require_field_unknown() {
        let schema = RecordSchema::astorb();
        assert!(schema.require_field("Albedo").is_err());
    }
}
