//! Schema evolution checks between a deployed schema and its replacement
//!
//! A candidate schema may only add columns. Every column of the prior
//! schema must survive unchanged; each difference is reported as its own
//! diagnostic so the user sees everything that would break at once.

use olapschema_core::{
    Diagnostic, DiagnosticCode, FieldKind, FieldSpec, Schema, Severity, TimeGranularitySpec,
};

/// Errors raised before a comparison can start
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvolutionError {
    #[error("No prior schema to compare '{schema}' against")]
    MissingPriorSchema { schema: String },
}

/// Result of comparing a candidate schema against the prior one
#[derive(Debug, Clone)]
pub struct SchemaEvolution {
    /// Name of the candidate schema
    pub schema_name: String,

    /// One diagnostic per removed, changed or added column attribute
    pub diagnostics: Vec<Diagnostic>,
}

impl SchemaEvolution {
    /// Compare `candidate` against `prior`
    ///
    /// Reports:
    /// - removed columns
    /// - per-attribute changes of surviving columns
    /// - added columns (info level)
    pub fn compare(prior: &Schema, candidate: &Schema) -> Self {
        let mut diagnostics = Vec::new();

        for old in prior.field_specs() {
            match candidate.field_spec(old.name()) {
                Some(new) if new == old => {}
                Some(new) => diagnose_change(old, new, &mut diagnostics),
                None => diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::CompatColumnRemoved,
                        Severity::Error,
                        format!("Column '{}' was removed", old.name()),
                    )
                    .with_column(old.name()),
                ),
            }
        }

        for new in candidate.field_specs() {
            if !prior.has_column(new.name()) {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::CompatColumnAdded,
                        Severity::Info,
                        format!("Column '{}' was added as {}", new.name(), new.field_type()),
                    )
                    .with_column(new.name()),
                );
            }
        }

        let evolution = Self {
            schema_name: candidate.schema_name().to_string(),
            diagnostics,
        };

        tracing::info!(
            schema = %evolution.schema_name,
            breaking = evolution.breaking_change_count(),
            compatible = evolution.is_backward_compatible(),
            "Compared schema against prior version"
        );

        evolution
    }

    /// Like [`SchemaEvolution::compare`], for a prior that may not exist
    pub fn check(candidate: &Schema, prior: Option<&Schema>) -> Result<Self, EvolutionError> {
        let prior = prior.ok_or_else(|| EvolutionError::MissingPriorSchema {
            schema: candidate.schema_name().to_string(),
        })?;
        Ok(Self::compare(prior, candidate))
    }

    /// True when no breaking change was found
    ///
    /// Always agrees with [`Schema::is_backward_compatible_with`].
    pub fn is_backward_compatible(&self) -> bool {
        self.breaking_change_count() == 0
    }

    pub fn breaking_change_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code.is_breaking_change())
            .count()
    }

    /// Diagnostics for columns that break compatibility
    pub fn breaking_changes(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.code.is_breaking_change())
    }

    /// Names of columns the candidate adds
    pub fn added_columns(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::CompatColumnAdded)
            .filter_map(|d| d.column.as_deref())
            .collect()
    }
}

fn changed(
    code: DiagnosticCode,
    column: &str,
    what: &str,
    expected: impl ToString,
    actual: impl ToString,
) -> Diagnostic {
    let (expected, actual) = (expected.to_string(), actual.to_string());
    Diagnostic::new(
        code,
        Severity::Error,
        format!("Column '{}' changed {}: was {}, now {}", column, what, expected, actual),
    )
    .with_column(column)
    .with_comparison(expected, actual)
}

fn optional(value: Option<&str>) -> &str {
    value.unwrap_or("none")
}

/// Push one diagnostic per differing attribute of a surviving column
fn diagnose_change(old: &FieldSpec, new: &FieldSpec, diagnostics: &mut Vec<Diagnostic>) {
    let name = old.name();

    if old.field_type() != new.field_type() {
        diagnostics.push(changed(
            DiagnosticCode::CompatFieldTypeChanged,
            name,
            "field type",
            old.field_type(),
            new.field_type(),
        ));
        // Remaining attributes are not comparable across kinds
        return;
    }

    if old.data_type() != new.data_type() {
        diagnostics.push(changed(
            DiagnosticCode::CompatDataTypeChanged,
            name,
            "data type",
            old.data_type(),
            new.data_type(),
        ));
    } else if old.default_null_value() != new.default_null_value() {
        diagnostics.push(changed(
            DiagnosticCode::CompatDefaultValueChanged,
            name,
            "default null value",
            old.default_null_value(),
            new.default_null_value(),
        ));
    }

    if old.is_single_value_field() != new.is_single_value_field() {
        let cardinality = |spec: &FieldSpec| {
            if spec.is_single_value_field() {
                "single-value"
            } else {
                "multi-value"
            }
        };
        diagnostics.push(changed(
            DiagnosticCode::CompatCardinalityChanged,
            name,
            "cardinality",
            cardinality(old),
            cardinality(new),
        ));
    }

    match (old.kind(), new.kind()) {
        (
            FieldKind::Time {
                incoming: old_incoming,
                outgoing: old_outgoing,
            },
            FieldKind::Time {
                incoming: new_incoming,
                outgoing: new_outgoing,
            },
        ) => {
            if old_incoming != new_incoming || old_outgoing != new_outgoing {
                let describe = |spec: &FieldSpec| {
                    let incoming = spec.incoming_granularity().map(granularity_label);
                    let outgoing = spec.outgoing_granularity().map(granularity_label);
                    format!(
                        "{} -> {}",
                        incoming.unwrap_or_default(),
                        outgoing.unwrap_or_default()
                    )
                };
                diagnostics.push(changed(
                    DiagnosticCode::CompatTimeGranularityChanged,
                    name,
                    "time granularity",
                    describe(old),
                    describe(new),
                ));
            }
        }
        (FieldKind::DateTime { .. }, FieldKind::DateTime { .. }) => {
            let describe = |spec: &FieldSpec| {
                format!(
                    "{} / {} / {}",
                    spec.date_time_format().map(|f| f.to_string()).unwrap_or_default(),
                    spec.date_time_granularity().map(|g| g.to_string()).unwrap_or_default(),
                    spec.date_time_type().map_or("none", |t| t.as_str())
                )
            };
            let (old_label, new_label) = (describe(old), describe(new));
            if old_label != new_label {
                diagnostics.push(changed(
                    DiagnosticCode::CompatDateTimeFormatChanged,
                    name,
                    "date-time format",
                    old_label,
                    new_label,
                ));
            }
        }
        _ => {}
    }

    if old.max_length() != new.max_length() {
        diagnostics.push(changed(
            DiagnosticCode::CompatFieldAttributeChanged,
            name,
            "max length",
            old.max_length(),
            new.max_length(),
        ));
    }

    if old.transform_function() != new.transform_function() {
        diagnostics.push(changed(
            DiagnosticCode::CompatFieldAttributeChanged,
            name,
            "transform function",
            optional(old.transform_function()),
            optional(new.transform_function()),
        ));
    }
}

fn granularity_label(spec: &TimeGranularitySpec) -> String {
    format!(
        "{}:{}:{}:{}",
        spec.name, spec.time_unit_size, spec.time_type, spec.time_format
    )
}
