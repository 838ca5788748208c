//! Diagnostic codes for schema validation and evolution checks
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Schema validation
    /// More than one TIME column is declared
    SchemaMultipleTimeColumns,

    /// A metric column uses a non-numeric type other than BYTES (e.g. BOOLEAN)
    SchemaUnsupportedMetricType,

    /// A multi-value dimension column uses the BOOLEAN data type
    SchemaBooleanMultiValueDimension,

    /// Upsert mode without a primary key naming a dimension column
    SchemaUpsertPrimaryKeyMissing,

    // Schema evolution
    /// A column of the prior schema is missing from the candidate
    CompatColumnRemoved,

    /// A column changed kind (e.g. dimension to metric)
    CompatFieldTypeChanged,

    /// A column changed data type
    CompatDataTypeChanged,

    /// A column switched between single- and multi-value
    CompatCardinalityChanged,

    /// A column changed its default null value
    CompatDefaultValueChanged,

    /// The time column changed granularity, unit, format or name
    CompatTimeGranularityChanged,

    /// A date-time column changed format, granularity or type
    CompatDateTimeFormatChanged,

    /// A column changed max length or transform function
    CompatFieldAttributeChanged,

    /// The candidate adds a new column
    CompatColumnAdded,

    // General
    /// General informational message
    Info,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaMultipleTimeColumns => "SCHEMA_MULTIPLE_TIME_COLUMNS",
            Self::SchemaUnsupportedMetricType => "SCHEMA_UNSUPPORTED_METRIC_TYPE",
            Self::SchemaBooleanMultiValueDimension => "SCHEMA_BOOLEAN_MULTI_VALUE_DIMENSION",
            Self::SchemaUpsertPrimaryKeyMissing => "SCHEMA_UPSERT_PRIMARY_KEY_MISSING",
            Self::CompatColumnRemoved => "COMPAT_COLUMN_REMOVED",
            Self::CompatFieldTypeChanged => "COMPAT_FIELD_TYPE_CHANGED",
            Self::CompatDataTypeChanged => "COMPAT_DATA_TYPE_CHANGED",
            Self::CompatCardinalityChanged => "COMPAT_CARDINALITY_CHANGED",
            Self::CompatDefaultValueChanged => "COMPAT_DEFAULT_VALUE_CHANGED",
            Self::CompatTimeGranularityChanged => "COMPAT_TIME_GRANULARITY_CHANGED",
            Self::CompatDateTimeFormatChanged => "COMPAT_DATE_TIME_FORMAT_CHANGED",
            Self::CompatFieldAttributeChanged => "COMPAT_FIELD_ATTRIBUTE_CHANGED",
            Self::CompatColumnAdded => "COMPAT_COLUMN_ADDED",
            Self::Info => "INFO",
        }
    }

    /// Whether this code marks a change that breaks backward compatibility
    pub fn is_breaking_change(&self) -> bool {
        matches!(
            self,
            Self::CompatColumnRemoved
                | Self::CompatFieldTypeChanged
                | Self::CompatDataTypeChanged
                | Self::CompatCardinalityChanged
                | Self::CompatDefaultValueChanged
                | Self::CompatTimeGranularityChanged
                | Self::CompatDateTimeFormatChanged
                | Self::CompatFieldAttributeChanged
        )
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - the schema must not be deployed
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Column the diagnostic is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Expected value (for comparison diagnostics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    /// Actual value (for comparison diagnostics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            column: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(
            DiagnosticCode::SchemaUnsupportedMetricType.as_str(),
            "SCHEMA_UNSUPPORTED_METRIC_TYPE"
        );
        assert_eq!(DiagnosticCode::CompatColumnRemoved.as_str(), "COMPAT_COLUMN_REMOVED");
        assert_eq!(
            serde_json::to_string(&DiagnosticCode::CompatDataTypeChanged).unwrap(),
            "\"COMPAT_DATA_TYPE_CHANGED\""
        );
    }

    #[test]
    fn breaking_changes() {
        assert!(DiagnosticCode::CompatDefaultValueChanged.is_breaking_change());
        assert!(!DiagnosticCode::CompatColumnAdded.is_breaking_change());
        assert!(!DiagnosticCode::SchemaUnsupportedMetricType.is_breaking_change());
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            DiagnosticCode::CompatDataTypeChanged,
            Severity::Error,
            "Column 'id' changed data type",
        )
        .with_column("id")
        .with_comparison("INT", "LONG");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("COMPAT_DATA_TYPE_CHANGED"));
        assert!(json.contains("\"column\":\"id\""));
        assert!(json.contains("error"));
    }
}
