//! Generic key/value record holding a schema
//!
//! Metadata stores keep schemas as records keyed by schema name, with the
//! compact JSON form under a single simple field.

use crate::error::SchemaError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simple-field key carrying the schema JSON
pub const SCHEMA_JSON_FIELD: &str = "schemaJSON";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    /// Record id, the schema name
    pub id: String,

    #[serde(default)]
    pub simple_fields: BTreeMap<String, String>,
}

impl SchemaRecord {
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        let mut simple_fields = BTreeMap::new();
        simple_fields.insert(
            SCHEMA_JSON_FIELD.to_string(),
            schema.to_single_line_json_string()?,
        );

        Ok(Self {
            id: schema.schema_name().to_string(),
            simple_fields,
        })
    }

    pub fn to_schema(&self) -> Result<Schema, SchemaError> {
        let json = self.simple_fields.get(SCHEMA_JSON_FIELD).ok_or_else(|| {
            SchemaError::Parse(format!(
                "record '{}' has no '{}' field",
                self.id, SCHEMA_JSON_FIELD
            ))
        })?;

        Schema::from_json_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::field_spec::FieldSpec;

    #[test]
    fn record_keyed_by_schema_name() {
        let mut schema = Schema::new("clicks");
        schema
            .add_field(FieldSpec::metric("count", DataType::Long))
            .unwrap();

        let record = SchemaRecord::from_schema(&schema).unwrap();
        assert_eq!(record.id, "clicks");
        assert_eq!(
            record.simple_fields[SCHEMA_JSON_FIELD],
            schema.to_single_line_json_string().unwrap()
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"simpleFields\""));
        let reloaded: SchemaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.to_schema().unwrap(), schema);
    }

    #[test]
    fn missing_payload_fails() {
        let record = SchemaRecord {
            id: "empty".to_string(),
            simple_fields: BTreeMap::new(),
        };
        assert!(matches!(record.to_schema(), Err(SchemaError::Parse(_))));
    }
}
