//! Error types for schema construction, parsing and serialization

use crate::data_type::DataType;

/// Errors raised while building, parsing or serializing a schema
///
/// Validation failures are not errors: see [`crate::ValidationResult`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse schema JSON: {0}")]
    Parse(String),

    #[error("Failed to serialize schema: {0}")]
    Serialize(String),

    #[error("Invalid format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    #[error("Invalid default null value '{value}' for data type {data_type}: {reason}")]
    InvalidDefaultValue {
        data_type: DataType,
        value: String,
        reason: String,
    },

    #[error("Column '{0}' is already defined in the schema")]
    DuplicateColumn(String),

    #[error("Column name must not be empty")]
    EmptyColumnName,
}

impl SchemaError {
    pub(crate) fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
