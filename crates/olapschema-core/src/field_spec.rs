//! Column descriptions
//!
//! A [`FieldSpec`] holds the attributes every column shares and a
//! [`FieldKind`] carrying what is specific to dimensions, metrics, the time
//! column and date-time columns. The kind is fixed at construction: a
//! dimension can never be turned into a metric.

use crate::data_type::{DataType, FieldType};
use crate::default_value::DefaultValue;
use crate::error::SchemaError;
use crate::granularity::{
    DateTimeFormatSpec, DateTimeGranularitySpec, DateTimeType, TimeGranularitySpec,
};

/// Maximum length of STRING values unless declared otherwise
pub const DEFAULT_MAX_LENGTH: u32 = 512;

/// Kind-specific part of a column description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Attribute column used for filtering and grouping
    Dimension,

    /// Aggregatable measure
    Metric,

    /// The table's time column
    ///
    /// `outgoing` is `None` when the stored granularity equals the incoming one.
    Time {
        incoming: TimeGranularitySpec,
        outgoing: Option<TimeGranularitySpec>,
    },

    /// Additional timestamp column with an explicit format and granularity
    DateTime {
        format: DateTimeFormatSpec,
        granularity: DateTimeGranularitySpec,
        date_time_type: Option<DateTimeType>,
    },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Dimension => FieldType::Dimension,
            Self::Metric => FieldType::Metric,
            Self::Time { .. } => FieldType::Time,
            Self::DateTime { .. } => FieldType::DateTime,
        }
    }
}

/// Description of a single column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: String,
    data_type: DataType,
    single_value: bool,
    default_null_value: DefaultValue,
    max_length: u32,
    transform_function: Option<String>,
    kind: FieldKind,
}

impl FieldSpec {
    fn with_kind(name: String, data_type: DataType, single_value: bool, kind: FieldKind) -> Self {
        Self {
            default_null_value: DefaultValue::for_field(kind.field_type(), data_type),
            name,
            data_type,
            single_value,
            max_length: DEFAULT_MAX_LENGTH,
            transform_function: None,
            kind,
        }
    }

    /// Dimension column, single- or multi-valued
    pub fn dimension(name: impl Into<String>, data_type: DataType, single_value: bool) -> Self {
        Self::with_kind(name.into(), data_type, single_value, FieldKind::Dimension)
    }

    /// Metric column (always single-valued)
    pub fn metric(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_kind(name.into(), data_type, true, FieldKind::Metric)
    }

    /// Time column
    ///
    /// The column takes its name and data type from the outgoing granularity
    /// when one is given, otherwise from the incoming one. An outgoing
    /// granularity equal to the incoming one is dropped.
    pub fn time(
        incoming: TimeGranularitySpec,
        outgoing: Option<TimeGranularitySpec>,
    ) -> Result<Self, SchemaError> {
        incoming.check()?;
        if let Some(outgoing) = &outgoing {
            outgoing.check()?;
        }

        let outgoing = outgoing.filter(|outgoing| *outgoing != incoming);
        let effective = outgoing.as_ref().unwrap_or(&incoming);
        let (name, data_type) = (effective.name.clone(), effective.data_type);

        Ok(Self::with_kind(
            name,
            data_type,
            true,
            FieldKind::Time { incoming, outgoing },
        ))
    }

    /// Date-time column from its format and granularity strings
    pub fn date_time(
        name: impl Into<String>,
        data_type: DataType,
        format: &str,
        granularity: &str,
    ) -> Result<Self, SchemaError> {
        let kind = FieldKind::DateTime {
            format: format.parse()?,
            granularity: granularity.parse()?,
            date_time_type: None,
        };
        Ok(Self::with_kind(name.into(), data_type, true, kind))
    }

    /// Replace the default null value, coercing it to the column's data type
    pub fn with_default_null_value(
        mut self,
        value: impl Into<DefaultValue>,
    ) -> Result<Self, SchemaError> {
        self.set_default_null_value(value)?;
        Ok(self)
    }

    pub fn set_default_null_value(
        &mut self,
        value: impl Into<DefaultValue>,
    ) -> Result<(), SchemaError> {
        self.default_null_value = value.into().coerce(self.data_type)?;
        Ok(())
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_transform_function(mut self, transform_function: impl Into<String>) -> Self {
        self.transform_function = Some(transform_function.into());
        self
    }

    /// Tag a date-time column; other kinds are returned unchanged
    pub fn with_date_time_type(mut self, tag: DateTimeType) -> Self {
        if let FieldKind::DateTime { date_time_type, .. } = &mut self.kind {
            *date_time_type = Some(tag);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_single_value_field(&self) -> bool {
        self.single_value
    }

    pub fn default_null_value(&self) -> &DefaultValue {
        &self.default_null_value
    }

    /// Default this column would have if none were declared
    pub fn implicit_default_null_value(&self) -> DefaultValue {
        DefaultValue::for_field(self.field_type(), self.data_type)
    }

    /// Whether the default null value was set to something other than the implicit one
    pub fn has_explicit_default_null_value(&self) -> bool {
        self.default_null_value != self.implicit_default_null_value()
    }

    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    pub fn transform_function(&self) -> Option<&str> {
        self.transform_function.as_deref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn incoming_granularity(&self) -> Option<&TimeGranularitySpec> {
        match &self.kind {
            FieldKind::Time { incoming, .. } => Some(incoming),
            _ => None,
        }
    }

    /// Stored granularity of a time column (the incoming one when no outgoing was declared)
    pub fn outgoing_granularity(&self) -> Option<&TimeGranularitySpec> {
        match &self.kind {
            FieldKind::Time { incoming, outgoing } => Some(outgoing.as_ref().unwrap_or(incoming)),
            _ => None,
        }
    }

    pub fn date_time_format(&self) -> Option<&DateTimeFormatSpec> {
        match &self.kind {
            FieldKind::DateTime { format, .. } => Some(format),
            _ => None,
        }
    }

    pub fn date_time_granularity(&self) -> Option<&DateTimeGranularitySpec> {
        match &self.kind {
            FieldKind::DateTime { granularity, .. } => Some(granularity),
            _ => None,
        }
    }

    pub fn date_time_type(&self) -> Option<DateTimeType> {
        match &self.kind {
            FieldKind::DateTime { date_time_type, .. } => *date_time_type,
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} {}", self.name, self.field_type(), self.data_type)?;
        if !self.single_value {
            write!(f, ", multi-value")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::TimeUnit;

    #[test]
    fn dimension_defaults() {
        let spec = FieldSpec::dimension("country", DataType::String, false);
        assert_eq!(spec.field_type(), FieldType::Dimension);
        assert!(!spec.is_single_value_field());
        assert_eq!(spec.default_null_value(), &DefaultValue::from("null"));
        assert!(!spec.has_explicit_default_null_value());
        assert_eq!(spec.max_length(), DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn metric_default_is_zero() {
        let spec = FieldSpec::metric("clicks", DataType::Long);
        assert!(spec.is_single_value_field());
        assert_eq!(spec.default_null_value(), &DefaultValue::Long(0));
    }

    #[test]
    fn default_is_coerced_to_data_type() {
        let spec = FieldSpec::dimension("id", DataType::Long, true)
            .with_default_null_value(10)
            .unwrap();
        assert_eq!(spec.default_null_value(), &DefaultValue::Long(10));
        assert!(spec.has_explicit_default_null_value());

        let err = FieldSpec::metric("m", DataType::Int).with_default_null_value("ten");
        assert!(matches!(err, Err(SchemaError::InvalidDefaultValue { .. })));

        let err = FieldSpec::metric("m", DataType::Float).with_default_null_value(1e300_f64);
        assert!(matches!(err, Err(SchemaError::InvalidDefaultValue { .. })));
    }

    #[test]
    fn time_takes_identity_from_outgoing() {
        let incoming = TimeGranularitySpec::new(DataType::Long, 1, TimeUnit::Hours, "incoming");
        let outgoing = TimeGranularitySpec::new(DataType::Int, 1, TimeUnit::Days, "outgoing");
        let spec = FieldSpec::time(incoming.clone(), Some(outgoing.clone())).unwrap();

        assert_eq!(spec.name(), "outgoing");
        assert_eq!(spec.data_type(), DataType::Int);
        assert_eq!(spec.default_null_value(), &DefaultValue::Int(i32::MIN));
        assert_eq!(spec.incoming_granularity(), Some(&incoming));
        assert_eq!(spec.outgoing_granularity(), Some(&outgoing));
    }

    #[test]
    fn identical_outgoing_granularity_is_normalized() {
        let incoming = TimeGranularitySpec::new(DataType::Long, 1, TimeUnit::Days, "time");
        let with_outgoing = FieldSpec::time(incoming.clone(), Some(incoming.clone())).unwrap();
        let without = FieldSpec::time(incoming.clone(), None).unwrap();
        assert_eq!(with_outgoing, without);
        assert_eq!(without.outgoing_granularity(), Some(&incoming));
    }

    #[test]
    fn date_time_parses_format_strings() {
        let spec = FieldSpec::date_time("ts", DataType::Long, "1:HOURS:EPOCH", "1:HOURS")
            .unwrap()
            .with_date_time_type(DateTimeType::Primary);
        assert_eq!(spec.field_type(), FieldType::DateTime);
        assert_eq!(spec.date_time_format().unwrap().to_string(), "1:HOURS:EPOCH");
        assert_eq!(spec.date_time_granularity().unwrap().to_string(), "1:HOURS");
        assert_eq!(spec.date_time_type(), Some(DateTimeType::Primary));
        assert_eq!(spec.default_null_value(), &DefaultValue::Long(i64::MIN));

        assert!(FieldSpec::date_time("ts", DataType::Long, "HOURS", "1:HOURS").is_err());
    }

    #[test]
    fn date_time_type_ignored_for_other_kinds() {
        let spec = FieldSpec::metric("m", DataType::Int).with_date_time_type(DateTimeType::Primary);
        assert_eq!(spec.date_time_type(), None);
        assert_eq!(spec.kind(), &FieldKind::Metric);
    }
}
