//! JSON interchange form of a schema
//!
//! Columns are grouped by kind under fixed keys, in this order:
//! `schemaName`, `dimensionFieldSpecs`, `metricFieldSpecs`, `timeFieldSpec`,
//! `dateTimeFieldSpecs`, `ingestionModeConfig`. Attributes holding their
//! implicit value are left out, so the output stays minimal and stable.

use crate::data_type::DataType;
use crate::default_value::DefaultValue;
use crate::error::SchemaError;
use crate::field_spec::{FieldKind, FieldSpec, DEFAULT_MAX_LENGTH};
use crate::granularity::{
    DateTimeFormatSpec, DateTimeGranularitySpec, DateTimeType, TimeGranularitySpec,
};
use crate::schema::{IngestionModeConfig, Schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

fn is_default_max_length(value: &u32) -> bool {
    *value == DEFAULT_MAX_LENGTH
}

/// Serialized form of a whole schema
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaDocument {
    #[serde(default)]
    schema_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dimension_field_specs: Vec<ColumnDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    metric_field_specs: Vec<ColumnDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_field_spec: Option<TimeDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    date_time_field_specs: Vec<DateTimeDocument>,

    #[serde(default, skip_serializing_if = "IngestionModeConfig::is_default")]
    ingestion_mode_config: IngestionModeConfig,
}

/// Serialized dimension or metric column
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnDocument {
    name: String,

    data_type: DataType,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    single_value_field: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_null_value: Option<Value>,

    #[serde(default = "default_max_length", skip_serializing_if = "is_default_max_length")]
    max_length: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    transform_function: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeDocument {
    incoming_granularity_spec: TimeGranularitySpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    outgoing_granularity_spec: Option<TimeGranularitySpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_null_value: Option<Value>,

    #[serde(default = "default_max_length", skip_serializing_if = "is_default_max_length")]
    max_length: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    transform_function: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateTimeDocument {
    #[serde(flatten)]
    column: ColumnDocument,

    format: DateTimeFormatSpec,

    granularity: DateTimeGranularitySpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time_type: Option<DateTimeType>,
}

fn explicit_default(spec: &FieldSpec) -> Option<Value> {
    spec.has_explicit_default_null_value()
        .then(|| spec.default_null_value().to_json())
}

/// Apply the attributes shared by every column kind
fn finish_spec(
    mut spec: FieldSpec,
    default_null_value: Option<Value>,
    max_length: u32,
    transform_function: Option<String>,
) -> Result<FieldSpec, SchemaError> {
    if let Some(value) = default_null_value {
        let value = DefaultValue::from_json(spec.data_type(), &value)?;
        spec.set_default_null_value(value)?;
    }

    spec = spec.with_max_length(max_length);
    if let Some(transform_function) = transform_function {
        spec = spec.with_transform_function(transform_function);
    }

    Ok(spec)
}

impl ColumnDocument {
    fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            data_type: spec.data_type(),
            single_value_field: spec.is_single_value_field(),
            default_null_value: explicit_default(spec),
            max_length: spec.max_length(),
            transform_function: spec.transform_function().map(str::to_string),
        }
    }

    fn into_dimension(self) -> Result<FieldSpec, SchemaError> {
        let spec = FieldSpec::dimension(self.name, self.data_type, self.single_value_field);
        finish_spec(
            spec,
            self.default_null_value,
            self.max_length,
            self.transform_function,
        )
    }

    /// Only dimensions may be multi-valued
    fn require_single_value(&self, kind: &str) -> Result<(), SchemaError> {
        if self.single_value_field {
            Ok(())
        } else {
            Err(SchemaError::Parse(format!(
                "{} column '{}' cannot be multi-valued",
                kind, self.name
            )))
        }
    }

    fn into_metric(self) -> Result<FieldSpec, SchemaError> {
        self.require_single_value("metric")?;
        let spec = FieldSpec::metric(self.name, self.data_type);
        finish_spec(
            spec,
            self.default_null_value,
            self.max_length,
            self.transform_function,
        )
    }
}

impl TimeDocument {
    fn from_spec(spec: &FieldSpec) -> Option<Self> {
        match spec.kind() {
            FieldKind::Time { incoming, outgoing } => Some(Self {
                incoming_granularity_spec: incoming.clone(),
                outgoing_granularity_spec: outgoing.clone(),
                default_null_value: explicit_default(spec),
                max_length: spec.max_length(),
                transform_function: spec.transform_function().map(str::to_string),
            }),
            _ => None,
        }
    }

    fn into_spec(self) -> Result<FieldSpec, SchemaError> {
        let spec = FieldSpec::time(
            self.incoming_granularity_spec,
            self.outgoing_granularity_spec,
        )?;
        finish_spec(
            spec,
            self.default_null_value,
            self.max_length,
            self.transform_function,
        )
    }
}

impl DateTimeDocument {
    fn from_spec(spec: &FieldSpec) -> Option<Self> {
        match spec.kind() {
            FieldKind::DateTime {
                format,
                granularity,
                date_time_type,
            } => Some(Self {
                column: ColumnDocument::from_spec(spec),
                format: format.clone(),
                granularity: granularity.clone(),
                date_time_type: *date_time_type,
            }),
            _ => None,
        }
    }

    fn into_spec(self) -> Result<FieldSpec, SchemaError> {
        let column = self.column;
        column.require_single_value("date-time")?;
        let mut spec = FieldSpec::date_time(
            column.name,
            column.data_type,
            &self.format.to_string(),
            &self.granularity.to_string(),
        )?;
        if let Some(date_time_type) = self.date_time_type {
            spec = spec.with_date_time_type(date_time_type);
        }
        finish_spec(
            spec,
            column.default_null_value,
            column.max_length,
            column.transform_function,
        )
    }
}

impl TryFrom<&Schema> for SchemaDocument {
    type Error = SchemaError;

    fn try_from(schema: &Schema) -> Result<Self, Self::Error> {
        let mut time_documents = schema.time_specs().filter_map(TimeDocument::from_spec);
        let time_field_spec = time_documents.next();
        if time_documents.next().is_some() {
            return Err(SchemaError::Serialize(format!(
                "schema '{}' declares more than one time column",
                schema.schema_name()
            )));
        }

        Ok(Self {
            schema_name: schema.schema_name().to_string(),
            dimension_field_specs: schema.dimension_specs().map(ColumnDocument::from_spec).collect(),
            metric_field_specs: schema.metric_specs().map(ColumnDocument::from_spec).collect(),
            time_field_spec,
            date_time_field_specs: schema
                .date_time_specs()
                .filter_map(DateTimeDocument::from_spec)
                .collect(),
            ingestion_mode_config: schema.ingestion_mode_config().clone(),
        })
    }
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = SchemaError;

    fn try_from(document: SchemaDocument) -> Result<Self, Self::Error> {
        let mut schema = Schema::new(document.schema_name);

        for column in document.dimension_field_specs {
            schema.add_field(column.into_dimension()?)?;
        }
        for column in document.metric_field_specs {
            schema.add_field(column.into_metric()?)?;
        }
        if let Some(time) = document.time_field_spec {
            schema.add_field(time.into_spec()?)?;
        }
        for column in document.date_time_field_specs {
            schema.add_field(column.into_spec()?)?;
        }

        schema.set_ingestion_mode_config(document.ingestion_mode_config);
        Ok(schema)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SchemaDocument::try_from(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = SchemaDocument::deserialize(deserializer)?;
        Schema::try_from(document).map_err(serde::de::Error::custom)
    }
}

impl Schema {
    /// Multi-line JSON form
    pub fn to_pretty_json_string(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self).map_err(|e| SchemaError::Serialize(e.to_string()))
    }

    /// Compact single-line JSON form
    pub fn to_single_line_json_string(&self) -> Result<String, SchemaError> {
        serde_json::to_string(self).map_err(|e| SchemaError::Serialize(e.to_string()))
    }

    /// JSON value form (object keys are not order-preserving)
    pub fn to_json_value(&self) -> Result<Value, SchemaError> {
        serde_json::to_value(self).map_err(|e| SchemaError::Serialize(e.to_string()))
    }

    /// Parse a schema from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        tracing::debug!(
            schema = %schema.schema_name(),
            columns = schema.field_specs().len(),
            "Parsed schema"
        );
        Ok(schema)
    }

    /// Load a schema from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_json_str(&contents)
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}
