//! Structural validation of a schema
//!
//! Validation never fails: an inconsistent schema is still a usable object,
//! and the result says what is wrong with it.

use crate::data_type::DataType;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use crate::field_spec::FieldKind;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// Outcome of [`Schema::validate`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// One diagnostic per violated rule
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// True when no error-level diagnostic was produced
    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

impl Schema {
    /// Check the schema's internal consistency
    ///
    /// Collects every violation:
    /// - at most one TIME column
    /// - metrics are numeric or BYTES (never BOOLEAN)
    /// - no BOOLEAN multi-value dimensions
    /// - in upsert mode, the primary key names a dimension column
    pub fn validate(&self) -> ValidationResult {
        let mut diagnostics = Vec::new();
        let mut time_columns = Vec::new();

        for spec in self.field_specs() {
            match spec.kind() {
                FieldKind::Metric
                    if !(spec.data_type().is_numeric() || spec.data_type() == DataType::Bytes) =>
                {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::SchemaUnsupportedMetricType,
                            Severity::Error,
                            format!(
                                "Metric column '{}' cannot be {}",
                                spec.name(),
                                spec.data_type()
                            ),
                        )
                        .with_column(spec.name()),
                    );
                }
                FieldKind::Dimension
                    if !spec.is_single_value_field() && spec.data_type() == DataType::Boolean =>
                {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::SchemaBooleanMultiValueDimension,
                            Severity::Error,
                            format!(
                                "Multi-value dimension column '{}' cannot be BOOLEAN",
                                spec.name()
                            ),
                        )
                        .with_column(spec.name()),
                    );
                }
                FieldKind::Time { .. } => time_columns.push(spec.name()),
                _ => {}
            }
        }

        if time_columns.len() > 1 {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::SchemaMultipleTimeColumns,
                Severity::Error,
                format!(
                    "At most one time column is allowed, found {}: {}",
                    time_columns.len(),
                    time_columns.join(", ")
                ),
            ));
        }

        if self.is_schema_for_upsert() && self.primary_key_field_spec().is_none() {
            let message = if self.primary_key().is_empty() {
                "Upsert schema must declare a primary key".to_string()
            } else {
                format!(
                    "Primary key '{}' of upsert schema is not a dimension column",
                    self.primary_key()
                )
            };
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::SchemaUpsertPrimaryKeyMissing,
                Severity::Error,
                message,
            ));
        }

        for diagnostic in &diagnostics {
            tracing::debug!(
                schema = %self.schema_name(),
                code = %diagnostic.code,
                "{}",
                diagnostic.message
            );
        }

        ValidationResult { diagnostics }
    }
}
