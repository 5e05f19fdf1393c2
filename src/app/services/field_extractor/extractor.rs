//! Slicing and typed extraction of schema fields
//!
//! [`FieldExtractor::extract`] is the generic engine usable with any
//! [`RecordSchema`]; the instance methods assemble astorb records from the
//! field specs resolved once at construction.

use super::errors::MalformedFieldError;
use super::field_parsers::{
    field_text, parse_date, parse_integer, parse_optional_integer, parse_optional_real,
    parse_real,
};
use crate::Result;
use crate::app::models::{
    AsteroidRecord, Epoch, FieldKind, FieldSpec, FieldValue, OrbitalElement, OrbitalElementSet,
};
use crate::app::services::record_schema::RecordSchema;
use crate::app::services::record_validator::ValidatedLine;
use crate::constants::field_names;

/// Field specs of the astorb layout, resolved by name
#[derive(Debug, Clone, Copy)]
struct AstorbLayout {
    number: FieldSpec,
    identifier: FieldSpec,
    absolute_magnitude: FieldSpec,
    slope_parameter: FieldSpec,
    epoch: FieldSpec,
    mean_anomaly: FieldSpec,
    argument_of_perihelion: FieldSpec,
    longitude_of_ascending_node: FieldSpec,
    inclination: FieldSpec,
    eccentricity: FieldSpec,
    semimajor_axis: FieldSpec,
}

impl AstorbLayout {
    fn resolve(schema: &RecordSchema) -> Result<Self> {
        Ok(Self {
            number: schema.require_field(field_names::NUMBER)?,
            identifier: schema.require_field(field_names::IDENTIFIER)?,
            absolute_magnitude: schema.require_field(field_names::ABSOLUTE_MAGNITUDE)?,
            slope_parameter: schema.require_field(field_names::SLOPE_PARAMETER)?,
            epoch: schema.require_field(field_names::EPOCH)?,
            mean_anomaly: schema.require_field(field_names::MEAN_ANOMALY)?,
            argument_of_perihelion: schema.require_field(field_names::ARGUMENT_OF_PERIHELION)?,
            longitude_of_ascending_node: schema
                .require_field(field_names::LONGITUDE_OF_ASCENDING_NODE)?,
            inclination: schema.require_field(field_names::INCLINATION)?,
            eccentricity: schema.require_field(field_names::ECCENTRICITY)?,
            semimajor_axis: schema.require_field(field_names::SEMIMAJOR_AXIS)?,
        })
    }
}

/// Extracts typed values and astorb records from validated lines
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    layout: AstorbLayout,
    extract_epoch: bool,
}

impl FieldExtractor {
    /// Create an extractor for a schema that carries the astorb fields
    pub fn new(schema: &RecordSchema) -> Result<Self> {
        Ok(Self {
            layout: AstorbLayout::resolve(schema)?,
            extract_epoch: true,
        })
    }

    /// Enable or disable epoch extraction for assembled records
    pub fn with_epoch(mut self, enabled: bool) -> Self {
        self.extract_epoch = enabled;
        self
    }

    pub fn extracts_epoch(&self) -> bool {
        self.extract_epoch
    }

    /// Slice the field's columns and parse them according to its kind
    pub fn extract(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<FieldValue, MalformedFieldError> {
        let text = Self::slice(line, spec)?;

        match spec.kind {
            FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
            FieldKind::Real => parse_real(spec.name, text).map(FieldValue::Real),
            FieldKind::Integer => parse_integer(spec.name, text).map(FieldValue::Integer),
            FieldKind::Date => parse_date(spec.name, text).map(FieldValue::Date),
        }
    }

    /// Trimmed UTF-8 text of a field
    pub fn slice<'a>(
        line: &ValidatedLine<'a>,
        spec: &FieldSpec,
    ) -> std::result::Result<&'a str, MalformedFieldError> {
        let content = line.content();
        let bytes = content
            .get(spec.byte_range())
            .ok_or(MalformedFieldError::OutOfBounds {
                field: spec.name,
                end_column: spec.end_column,
                line_len: content.len(),
            })?;
        field_text(spec.name, bytes)
    }

    pub fn extract_real(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<f64, MalformedFieldError> {
        parse_real(spec.name, Self::slice(line, spec)?)
    }

    pub fn extract_optional_real(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<Option<f64>, MalformedFieldError> {
        parse_optional_real(spec.name, Self::slice(line, spec)?)
    }

    pub fn extract_optional_integer(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<Option<i64>, MalformedFieldError> {
        parse_optional_integer(spec.name, Self::slice(line, spec)?)
    }

    pub fn extract_text(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<String, MalformedFieldError> {
        Self::slice(line, spec).map(str::to_string)
    }

    pub fn extract_epoch(
        line: &ValidatedLine<'_>,
        spec: &FieldSpec,
    ) -> std::result::Result<Epoch, MalformedFieldError> {
        parse_date(spec.name, Self::slice(line, spec)?)
    }

    /// Extract the six orbital elements, each tagged with its unit and frame
    pub fn orbital_elements(
        &self,
        line: &ValidatedLine<'_>,
    ) -> std::result::Result<OrbitalElementSet, MalformedFieldError> {
        let element = |spec: &FieldSpec| {
            Self::extract_real(line, spec).map(|value| OrbitalElement::new(value, spec))
        };

        Ok(OrbitalElementSet {
            mean_anomaly: element(&self.layout.mean_anomaly)?,
            argument_of_perihelion: element(&self.layout.argument_of_perihelion)?,
            longitude_of_ascending_node: element(&self.layout.longitude_of_ascending_node)?,
            inclination: element(&self.layout.inclination)?,
            eccentricity: element(&self.layout.eccentricity)?,
            semimajor_axis: element(&self.layout.semimajor_axis)?,
        })
    }

    /// Assemble a full asteroid record
    ///
    /// The asteroid number, H and G may be blank in the catalog and come back
    /// as `None`; the orbital elements (and the epoch when enabled) are
    /// required.
    pub fn record(
        &self,
        line: &ValidatedLine<'_>,
        line_number: u64,
    ) -> std::result::Result<AsteroidRecord, MalformedFieldError> {
        let number = Self::extract_optional_integer(line, &self.layout.number)?
            .map(|value| {
                u32::try_from(value).map_err(|_| MalformedFieldError::InvalidInteger {
                    field: self.layout.number.name,
                    raw: value.to_string(),
                })
            })
            .transpose()?;

        let epoch = if self.extract_epoch {
            Some(Self::extract_epoch(line, &self.layout.epoch)?)
        } else {
            None
        };

        Ok(AsteroidRecord {
            line_number,
            number,
            identifier: Self::extract_text(line, &self.layout.identifier)?,
            absolute_magnitude: Self::extract_optional_real(line, &self.layout.absolute_magnitude)?,
            slope_parameter: Self::extract_optional_real(line, &self.layout.slope_parameter)?,
            epoch,
            elements: self.orbital_elements(line)?,
        })
    }
}
