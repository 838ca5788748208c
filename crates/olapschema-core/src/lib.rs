//! OlapSchema Core
//!
//! Table schema model for a columnar OLAP store: column descriptions,
//! the schema aggregate, validation, backward compatibility and the JSON
//! interchange form.
//! Never rename diagnostic codes - they are part of the public API.

pub mod builder;
pub mod codec;
pub mod config;
pub mod data_type;
pub mod default_value;
pub mod diagnostic;
pub mod error;
pub mod field_spec;
pub mod granularity;
pub mod record;
pub mod report;
pub mod schema;
pub mod validation;

pub use builder::SchemaBuilder;
pub use config::{Config, ConfigError, OutputFormat, SeverityThreshold};
pub use data_type::{DataType, FieldType, TimeUnit};
pub use default_value::DefaultValue;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::SchemaError;
pub use field_spec::{FieldKind, FieldSpec, DEFAULT_MAX_LENGTH};
pub use granularity::{
    DateTimeFormatSpec, DateTimeGranularitySpec, DateTimeType, TimeFormat, TimeGranularitySpec,
};
pub use record::SchemaRecord;
pub use report::{Report, ReportSummary, ReportVersion};
pub use schema::{IngestionMode, IngestionModeConfig, Schema};
pub use validation::ValidationResult;
