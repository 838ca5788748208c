//! Fluent schema construction

use crate::data_type::{DataType, TimeUnit};
use crate::default_value::DefaultValue;
use crate::error::SchemaError;
use crate::field_spec::FieldSpec;
use crate::granularity::TimeGranularitySpec;
use crate::schema::{IngestionModeConfig, Schema};

/// Accumulates columns and produces a [`Schema`]
///
/// Every `add_*` call is chainable. The first construction error (a
/// duplicate column, an unusable default, a malformed format string) is
/// kept and returned by [`SchemaBuilder::build`]; later calls are ignored.
/// `build` does not run [`Schema::validate`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema.set_schema_name(schema_name);
        self
    }

    fn push(mut self, spec: Result<FieldSpec, SchemaError>) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(err) = spec.and_then(|spec| self.schema.add_field(spec)) {
            tracing::debug!(schema = %self.schema.schema_name(), error = %err, "Rejected column");
            self.error = Some(err);
        }
        self
    }

    fn with_default(
        spec: FieldSpec,
        default: Option<DefaultValue>,
    ) -> Result<FieldSpec, SchemaError> {
        match default {
            Some(default) => spec.with_default_null_value(default),
            None => Ok(spec),
        }
    }

    /// Add an already constructed column
    pub fn add_field(self, spec: FieldSpec) -> Self {
        self.push(Ok(spec))
    }

    pub fn add_single_value_dimension(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.add_field(FieldSpec::dimension(name, data_type, true))
    }

    pub fn add_single_value_dimension_with_default(
        self,
        name: impl Into<String>,
        data_type: DataType,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.push(FieldSpec::dimension(name, data_type, true).with_default_null_value(default))
    }

    pub fn add_multi_value_dimension(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.add_field(FieldSpec::dimension(name, data_type, false))
    }

    pub fn add_multi_value_dimension_with_default(
        self,
        name: impl Into<String>,
        data_type: DataType,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.push(FieldSpec::dimension(name, data_type, false).with_default_null_value(default))
    }

    pub fn add_metric(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.add_field(FieldSpec::metric(name, data_type))
    }

    pub fn add_metric_with_default(
        self,
        name: impl Into<String>,
        data_type: DataType,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.push(FieldSpec::metric(name, data_type).with_default_null_value(default))
    }

    /// Add the time column from its incoming and optional outgoing granularity
    ///
    /// All other `add_time*` methods delegate here.
    pub fn add_time_field(
        self,
        incoming: TimeGranularitySpec,
        outgoing: Option<TimeGranularitySpec>,
        default: Option<DefaultValue>,
    ) -> Self {
        self.push(FieldSpec::time(incoming, outgoing).and_then(|spec| Self::with_default(spec, default)))
    }

    /// Time column with a unit size of one
    pub fn add_time(self, name: impl Into<String>, time_unit: TimeUnit, data_type: DataType) -> Self {
        self.add_time_with_size(name, 1, time_unit, data_type)
    }

    pub fn add_time_with_default(
        self,
        name: impl Into<String>,
        time_unit: TimeUnit,
        data_type: DataType,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.add_time_with_size_and_default(name, 1, time_unit, data_type, default)
    }

    pub fn add_time_with_size(
        self,
        name: impl Into<String>,
        time_unit_size: u32,
        time_unit: TimeUnit,
        data_type: DataType,
    ) -> Self {
        let incoming = TimeGranularitySpec::new(data_type, time_unit_size, time_unit, name);
        self.add_time_field(incoming, None, None)
    }

    pub fn add_time_with_size_and_default(
        self,
        name: impl Into<String>,
        time_unit_size: u32,
        time_unit: TimeUnit,
        data_type: DataType,
        default: impl Into<DefaultValue>,
    ) -> Self {
        let incoming = TimeGranularitySpec::new(data_type, time_unit_size, time_unit, name);
        self.add_time_field(incoming, None, Some(default.into()))
    }

    /// Time column converted between two unit-size-one granularities
    pub fn add_time_with_outgoing(
        self,
        incoming: (&str, TimeUnit, DataType),
        outgoing: (&str, TimeUnit, DataType),
    ) -> Self {
        self.add_time_with_sizes(
            (incoming.0, 1, incoming.1, incoming.2),
            (outgoing.0, 1, outgoing.1, outgoing.2),
        )
    }

    pub fn add_time_with_outgoing_and_default(
        self,
        incoming: (&str, TimeUnit, DataType),
        outgoing: (&str, TimeUnit, DataType),
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.add_time_with_sizes_and_default(
            (incoming.0, 1, incoming.1, incoming.2),
            (outgoing.0, 1, outgoing.1, outgoing.2),
            default,
        )
    }

    /// Time column converted between two sized granularities, each given
    /// as `(name, unit size, unit, data type)`
    pub fn add_time_with_sizes(
        self,
        incoming: (&str, u32, TimeUnit, DataType),
        outgoing: (&str, u32, TimeUnit, DataType),
    ) -> Self {
        self.add_time_field(granularity(incoming), Some(granularity(outgoing)), None)
    }

    pub fn add_time_with_sizes_and_default(
        self,
        incoming: (&str, u32, TimeUnit, DataType),
        outgoing: (&str, u32, TimeUnit, DataType),
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.add_time_field(
            granularity(incoming),
            Some(granularity(outgoing)),
            Some(default.into()),
        )
    }

    pub fn add_time_spec(self, incoming: TimeGranularitySpec) -> Self {
        self.add_time_field(incoming, None, None)
    }

    pub fn add_time_spec_with_default(
        self,
        incoming: TimeGranularitySpec,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.add_time_field(incoming, None, Some(default.into()))
    }

    pub fn add_time_specs(
        self,
        incoming: TimeGranularitySpec,
        outgoing: TimeGranularitySpec,
    ) -> Self {
        self.add_time_field(incoming, Some(outgoing), None)
    }

    pub fn add_time_specs_with_default(
        self,
        incoming: TimeGranularitySpec,
        outgoing: TimeGranularitySpec,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.add_time_field(incoming, Some(outgoing), Some(default.into()))
    }

    /// Date-time column from `<size>:<unit>:<format>` and `<size>:<unit>` strings
    pub fn add_date_time(
        self,
        name: impl Into<String>,
        data_type: DataType,
        format: &str,
        granularity: &str,
    ) -> Self {
        self.push(FieldSpec::date_time(name, data_type, format, granularity))
    }

    pub fn add_date_time_with_default(
        self,
        name: impl Into<String>,
        data_type: DataType,
        format: &str,
        granularity: &str,
        default: impl Into<DefaultValue>,
    ) -> Self {
        self.push(
            FieldSpec::date_time(name, data_type, format, granularity)
                .and_then(|spec| spec.with_default_null_value(default)),
        )
    }

    pub fn set_ingestion_mode_config(mut self, config: IngestionModeConfig) -> Self {
        self.schema.set_ingestion_mode_config(config);
        self
    }

    /// Finish construction
    pub fn build(self) -> Result<Schema, SchemaError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.schema),
        }
    }
}

fn granularity(
    (name, time_unit_size, time_unit, data_type): (&str, u32, TimeUnit, DataType),
) -> TimeGranularitySpec {
    TimeGranularitySpec::new(data_type, time_unit_size, time_unit, name)
}
