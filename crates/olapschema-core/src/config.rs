//! Configuration file (olapschema.toml)

use crate::diagnostic::{DiagnosticCode, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "olapschema.toml";

/// Layout used when writing schema JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Indented, one attribute per line
    #[default]
    Pretty,

    /// Compact, on one line
    SingleLine,
}

/// Severity overrides keyed by diagnostic code
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code (e.g. `COMPAT_COLUMN_ADDED`) to severity
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Severity for a code, or `default` when not overridden
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON layout for `format` and `hint` output
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Emit an info diagnostic for every column a candidate schema adds
    #[serde(default = "default_report_column_additions")]
    pub report_column_additions: bool,
}

fn default_report_column_additions() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            severity: SeverityThreshold::default(),
            report_column_additions: default_report_column_additions(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load config from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load `path` when given, else the default file when present, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Pretty);
        assert!(config.report_column_additions);
        assert!(config.severity.overrides.is_empty());
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(DiagnosticCode::CompatColumnAdded, Severity::Warn);

        assert_eq!(
            threshold.get_severity(DiagnosticCode::CompatColumnAdded, Severity::Info),
            Severity::Warn
        );
        assert_eq!(
            threshold.get_severity(DiagnosticCode::CompatColumnRemoved, Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn parse_toml() {
        let config = Config::from_toml(
            r#"
format = "single-line"
report_column_additions = false

[severity.overrides]
COMPAT_DEFAULT_VALUE_CHANGED = "warn"
"#,
        )
        .unwrap();

        assert_eq!(config.format, OutputFormat::SingleLine);
        assert!(!config.report_column_additions);
        assert_eq!(
            config
                .severity
                .get_severity(DiagnosticCode::CompatDefaultValueChanged, Severity::Error),
            Severity::Warn
        );
    }

    #[test]
    fn empty_toml_uses_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert!(matches!(
            Config::from_toml("format = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.format = OutputFormat::SingleLine;
        config
            .severity
            .set_override(DiagnosticCode::CompatColumnAdded, Severity::Warn);
        config.save_to_file(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
        assert_eq!(Config::discover(Some(&path)).unwrap(), config);
    }
}
