//! Report generation for validation and evolution checks

use crate::evolution::SchemaEvolution;
use olapschema_core::{Config, Diagnostic, DiagnosticCode, Report, Schema};

/// Runs checks against a schema and applies the configured severities
#[derive(Debug, Clone)]
pub struct SchemaCheck<'a> {
    config: &'a Config,
}

impl<'a> SchemaCheck<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Structural validation of one schema
    pub fn validate(&self, schema: &Schema) -> Report {
        let mut report =
            Report::new(schema.schema_name()).with_columns_checked(schema.field_specs().len());
        report.extend(self.adjust(schema.validate().diagnostics));
        report
    }

    /// Validation of `candidate` followed by its evolution from `prior`
    pub fn compare(&self, prior: &Schema, candidate: &Schema) -> (Report, SchemaEvolution) {
        let mut report = self.validate(candidate);
        let evolution = SchemaEvolution::compare(prior, candidate);

        let diagnostics = evolution.diagnostics.iter().cloned().filter(|d| {
            self.config.report_column_additions || d.code != DiagnosticCode::CompatColumnAdded
        });
        report.extend(self.adjust(diagnostics));

        (report, evolution)
    }

    fn adjust(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Vec<Diagnostic> {
        diagnostics
            .into_iter()
            .map(|mut diagnostic| {
                diagnostic.severity = self
                    .config
                    .severity
                    .get_severity(diagnostic.code, diagnostic.severity);
                diagnostic
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olapschema_core::{DataType, SchemaBuilder, Severity};

    fn prior() -> Schema {
        SchemaBuilder::new()
            .set_schema_name("events")
            .add_single_value_dimension("country", DataType::String)
            .add_metric("clicks", DataType::Long)
            .build()
            .unwrap()
    }

    #[test]
    fn validation_report() {
        let config = Config::default();
        let schema = SchemaBuilder::new()
            .set_schema_name("broken")
            .add_metric("flag", DataType::Boolean)
            .build()
            .unwrap();

        let report = SchemaCheck::new(&config).validate(&schema);
        assert_eq!(report.schema_name, "broken");
        assert_eq!(report.summary.columns_checked, 1);
        assert_eq!(report.summary.errors, 1);
        assert!(report.has_errors());
    }

    #[test]
    fn severity_overrides_apply() {
        let mut config = Config::default();
        config
            .severity
            .set_override(DiagnosticCode::CompatColumnRemoved, Severity::Warn);

        let mut candidate = prior();
        candidate.remove_field("clicks").unwrap();

        let (report, evolution) = SchemaCheck::new(&config).compare(&prior(), &candidate);
        assert!(!evolution.is_backward_compatible());
        assert!(!report.has_errors());
        assert_eq!(report.summary.warnings, 1);
    }

    #[test]
    fn column_additions_can_be_silenced() {
        let mut candidate = prior();
        candidate
            .add_field(olapschema_core::FieldSpec::metric("views", DataType::Long))
            .unwrap();

        let config = Config::default();
        let (report, _) = SchemaCheck::new(&config).compare(&prior(), &candidate);
        assert_eq!(report.summary.info, 1);

        let config = Config {
            report_column_additions: false,
            ..Config::default()
        };
        let (report, evolution) = SchemaCheck::new(&config).compare(&prior(), &candidate);
        assert_eq!(report.summary.total, 0);
        assert_eq!(evolution.added_columns(), vec!["views"]);
    }
}
