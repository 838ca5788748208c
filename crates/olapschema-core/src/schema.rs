//! The table schema aggregate

use crate::data_type::FieldType;
use crate::error::SchemaError;
use crate::field_spec::FieldSpec;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// How ingested rows are applied to the table
///
/// Parsing is lenient: any token other than `upsert` means append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IngestionMode {
    /// Rows are only ever appended
    #[default]
    Append,

    /// Rows replace earlier rows sharing the same primary key
    Upsert,
}

impl IngestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "APPEND",
            Self::Upsert => "UPSERT",
        }
    }

    /// Parse a mode token, falling back to [`IngestionMode::Append`]
    pub fn parse_lenient(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("upsert") {
            Self::Upsert
        } else {
            Self::Append
        }
    }
}

impl std::fmt::Display for IngestionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for IngestionMode {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<IngestionMode> for String {
    fn from(value: IngestionMode) -> Self {
        value.as_str().to_string()
    }
}

/// Ingestion hints carried by a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionModeConfig {
    #[serde(default)]
    pub ingestion_mode: IngestionMode,

    /// Name of the primary-key dimension, empty when unset
    #[serde(default)]
    pub primary_key: String,

    /// Name of the offset dimension used to order upserts, empty when unset
    #[serde(default)]
    pub offset_key: String,
}

impl IngestionModeConfig {
    /// Upsert configuration keyed by `primary_key`, ordered by `offset_key`
    pub fn upsert(primary_key: impl Into<String>, offset_key: impl Into<String>) -> Self {
        Self {
            ingestion_mode: IngestionMode::Upsert,
            primary_key: primary_key.into(),
            offset_key: offset_key.into(),
        }
    }

    /// Append mode with no keys
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Named collection of column descriptions for one table
///
/// Columns keep their insertion order. Equality and hashing are structural:
/// two schemas are equal when they have the same name, the same ingestion
/// hints and the same set of column descriptions.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    schema_name: String,
    fields: Vec<FieldSpec>,
    ingestion: IngestionModeConfig,
}

impl Schema {
    /// Create an empty schema
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            fields: Vec::new(),
            ingestion: IngestionModeConfig::default(),
        }
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn set_schema_name(&mut self, schema_name: impl Into<String>) {
        self.schema_name = schema_name.into();
    }

    /// Add a column
    ///
    /// Fails when the name is empty or already taken.
    pub fn add_field(&mut self, spec: FieldSpec) -> Result<(), SchemaError> {
        if spec.name().is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }
        if self.has_column(spec.name()) {
            return Err(SchemaError::DuplicateColumn(spec.name().to_string()));
        }
        self.fields.push(spec);
        Ok(())
    }

    /// Remove a column, returning its description if it existed
    pub fn remove_field(&mut self, name: &str) -> Option<FieldSpec> {
        let index = self.fields.iter().position(|spec| spec.name() == name)?;
        Some(self.fields.remove(index))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.field_spec(name).is_some()
    }

    /// Find a column by name
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name() == name)
    }

    pub fn field_spec_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.fields.iter_mut().find(|spec| spec.name() == name)
    }

    /// All columns in insertion order
    pub fn field_specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|spec| spec.name()).collect()
    }

    fn specs_of(&self, field_type: FieldType) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(move |spec| spec.field_type() == field_type)
    }

    fn spec_of(&self, field_type: FieldType, name: &str) -> Option<&FieldSpec> {
        self.field_spec(name)
            .filter(|spec| spec.field_type() == field_type)
    }

    pub fn dimension_specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs_of(FieldType::Dimension)
    }

    pub fn metric_specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs_of(FieldType::Metric)
    }

    pub fn date_time_specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs_of(FieldType::DateTime)
    }

    /// Every TIME column; a valid schema has at most one
    pub fn time_specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs_of(FieldType::Time)
    }

    pub fn dimension_names(&self) -> Vec<&str> {
        self.dimension_specs().map(|spec| spec.name()).collect()
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.metric_specs().map(|spec| spec.name()).collect()
    }

    pub fn date_time_names(&self) -> Vec<&str> {
        self.date_time_specs().map(|spec| spec.name()).collect()
    }

    pub fn dimension_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.spec_of(FieldType::Dimension, name)
    }

    pub fn metric_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.spec_of(FieldType::Metric, name)
    }

    pub fn date_time_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.spec_of(FieldType::DateTime, name)
    }

    /// The time column, if any
    pub fn time_field_spec(&self) -> Option<&FieldSpec> {
        self.time_specs().next()
    }

    pub fn time_field_spec_mut(&mut self) -> Option<&mut FieldSpec> {
        self.fields
            .iter_mut()
            .find(|spec| spec.field_type() == FieldType::Time)
    }

    pub fn ingestion_mode_config(&self) -> &IngestionModeConfig {
        &self.ingestion
    }

    pub fn set_ingestion_mode_config(&mut self, config: IngestionModeConfig) {
        self.ingestion = config;
    }

    pub fn ingestion_mode(&self) -> IngestionMode {
        self.ingestion.ingestion_mode
    }

    pub fn is_schema_for_upsert(&self) -> bool {
        self.ingestion.ingestion_mode == IngestionMode::Upsert
    }

    /// Primary-key column name, empty when unset
    pub fn primary_key(&self) -> &str {
        &self.ingestion.primary_key
    }

    /// Offset column name, empty when unset
    pub fn offset_key(&self) -> &str {
        &self.ingestion.offset_key
    }

    /// Dimension named by the primary key
    pub fn primary_key_field_spec(&self) -> Option<&FieldSpec> {
        self.dimension_spec(self.primary_key())
    }

    /// Dimension named by the offset key
    pub fn offset_key_field_spec(&self) -> Option<&FieldSpec> {
        self.dimension_spec(self.offset_key())
    }

    /// Take ingestion mode, primary key and offset key from `hint`
    ///
    /// Columns and the schema name are left untouched, and the result is
    /// not validated.
    pub fn apply_schema_hint(&mut self, hint: &Schema) {
        tracing::debug!(
            schema = %self.schema_name,
            hint = %hint.schema_name,
            mode = %hint.ingestion.ingestion_mode,
            "Applying ingestion hint"
        );
        self.ingestion = hint.ingestion.clone();
    }

    /// Builder-style form of [`Schema::apply_schema_hint`]
    pub fn with_schema_hint(mut self, hint: &Schema) -> Self {
        self.apply_schema_hint(hint);
        self
    }

    /// Whether this schema can replace `prior` without breaking existing data
    ///
    /// Every column of `prior` must be present here with an identical
    /// description. New columns are allowed; no type widening is.
    pub fn is_backward_compatible_with(&self, prior: &Schema) -> bool {
        prior
            .fields
            .iter()
            .all(|old| self.field_spec(old.name()) == Some(old))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.schema_name == other.schema_name
            && self.ingestion == other.ingestion
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|spec| other.field_spec(spec.name()) == Some(spec))
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema_name.hash(state);
        self.ingestion.hash(state);

        // Order-independent, matching equality
        let mut fields: Vec<&FieldSpec> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name().cmp(b.name()));
        fields.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::{DataType, TimeUnit};
    use crate::granularity::TimeGranularitySpec;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(schema: &Schema) -> u64 {
        let mut hasher = DefaultHasher::new();
        schema.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> Schema {
        let mut schema = Schema::new("sample");
        schema
            .add_field(FieldSpec::dimension("country", DataType::String, true))
            .unwrap();
        schema
            .add_field(FieldSpec::metric("clicks", DataType::Long))
            .unwrap();
        schema
            .add_field(
                FieldSpec::time(
                    TimeGranularitySpec::new(DataType::Long, 1, TimeUnit::Days, "day"),
                    None,
                )
                .unwrap(),
            )
            .unwrap();
        schema
    }

    #[test]
    fn lookups_respect_field_kind() {
        let schema = sample();
        assert!(schema.dimension_spec("country").is_some());
        assert!(schema.metric_spec("country").is_none());
        assert!(schema.metric_spec("clicks").is_some());
        assert_eq!(schema.time_field_spec().unwrap().name(), "day");
        assert!(schema.field_spec("missing").is_none());
        assert_eq!(schema.column_names(), vec!["country", "clicks", "day"]);
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let mut schema = sample();
        let err = schema
            .add_field(FieldSpec::metric("country", DataType::Int))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("country".to_string()));
        assert_eq!(
            schema.add_field(FieldSpec::metric("", DataType::Int)),
            Err(SchemaError::EmptyColumnName)
        );
    }

    #[test]
    fn remove_field() {
        let mut schema = sample();
        let removed = schema.remove_field("clicks").unwrap();
        assert_eq!(removed.name(), "clicks");
        assert!(!schema.has_column("clicks"));
        assert!(schema.remove_field("clicks").is_none());
    }

    #[test]
    fn equality_ignores_cross_group_order() {
        let mut reordered = Schema::new("sample");
        let original = sample();
        for spec in original.field_specs().iter().rev() {
            reordered.add_field(spec.clone()).unwrap();
        }
        assert_eq!(reordered, original);
        assert_eq!(hash_of(&reordered), hash_of(&original));
    }

    #[test]
    fn equality_covers_name_and_ingestion() {
        let original = sample();

        let mut renamed = original.clone();
        renamed.set_schema_name("other");
        assert_ne!(renamed, original);

        let mut upsert = original.clone();
        upsert.set_ingestion_mode_config(IngestionModeConfig::upsert("country", ""));
        assert_ne!(upsert, original);
        assert_ne!(hash_of(&upsert), hash_of(&original));
    }

    #[test]
    fn lenient_ingestion_mode() {
        assert_eq!(IngestionMode::parse_lenient("upsert"), IngestionMode::Upsert);
        assert_eq!(IngestionMode::parse_lenient("UPSERT"), IngestionMode::Upsert);
        assert_eq!(IngestionMode::parse_lenient("append"), IngestionMode::Append);
        assert_eq!(IngestionMode::parse_lenient("random"), IngestionMode::Append);
    }

    #[test]
    fn key_lookups() {
        let mut schema = sample();
        assert_eq!(schema.primary_key(), "");
        assert!(schema.primary_key_field_spec().is_none());

        schema.set_ingestion_mode_config(IngestionModeConfig::upsert("country", "clicks"));
        assert_eq!(schema.primary_key_field_spec().unwrap().name(), "country");
        // offset key must name a dimension
        assert!(schema.offset_key_field_spec().is_none());
    }

    #[test]
    fn schema_hint_only_touches_ingestion() {
        let mut hint = Schema::new("hint");
        hint.set_ingestion_mode_config(IngestionModeConfig::upsert("country", "offset"));

        let original = sample();
        let hinted = original.clone().with_schema_hint(&hint);

        assert!(hinted.is_schema_for_upsert());
        assert_eq!(hinted.primary_key(), "country");
        assert_eq!(hinted.offset_key(), "offset");
        assert_eq!(hinted.schema_name(), "sample");
        assert_eq!(hinted.field_specs(), original.field_specs());
    }

    #[test]
    fn backward_compatibility_allows_additions_only() {
        let prior = sample();

        let mut added = prior.clone();
        added
            .add_field(FieldSpec::dimension("city", DataType::String, true))
            .unwrap();
        assert!(added.is_backward_compatible_with(&prior));
        assert!(!prior.is_backward_compatible_with(&added));

        let mut widened = prior.clone();
        widened.remove_field("clicks");
        widened
            .add_field(FieldSpec::metric("clicks", DataType::Double))
            .unwrap();
        assert!(!widened.is_backward_compatible_with(&prior));
    }
}
