//! Shared schema definitions for the integration tests

use olapschema_core::{DataType, Schema, SchemaBuilder, TimeUnit};
use serde_json::json;
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Schema with one metric `m`, one dimension `d`, a millisecond time
/// column and a primary date-time column
pub fn make_schema(metric_type: DataType, dimension_type: DataType, single_value: bool) -> String {
    json!({
        "schemaName": "SchemaTest",
        "metricFieldSpecs": [{ "name": "m", "dataType": metric_type.as_str() }],
        "dimensionFieldSpecs": [{
            "name": "d",
            "dataType": dimension_type.as_str(),
            "singleValueField": single_value
        }],
        "timeFieldSpec": {
            "incomingGranularitySpec": {
                "dataType": "LONG",
                "timeType": "MILLISECONDS",
                "name": "time"
            },
            "defaultNullValue": 12345
        },
        "dateTimeFieldSpecs": [{
            "name": "Date",
            "dataType": "LONG",
            "format": "1:MILLISECONDS:EPOCH",
            "granularity": "5:MINUTES",
            "dateTimeType": "PRIMARY"
        }]
    })
    .to_string()
}

/// Like [`make_schema`] but with `primary`, `offset` and `other` dimensions
/// and an ingestion block
pub fn make_upsert_schema(
    metric_type: DataType,
    dimension_type: DataType,
    single_value: bool,
    ingestion_mode: &str,
    primary_key: &str,
    offset_key: &str,
) -> String {
    json!({
        "schemaName": "SchemaTest",
        "metricFieldSpecs": [{ "name": "m", "dataType": metric_type.as_str() }],
        "dimensionFieldSpecs": [
            {
                "name": "primary",
                "dataType": dimension_type.as_str(),
                "singleValueField": single_value
            },
            { "name": "offset", "dataType": "LONG" },
            { "name": "other", "dataType": "STRING" }
        ],
        "timeFieldSpec": {
            "incomingGranularitySpec": {
                "dataType": "LONG",
                "timeType": "MILLISECONDS",
                "name": "time"
            },
            "defaultNullValue": 12345
        },
        "dateTimeFieldSpecs": [{
            "name": "Date",
            "dataType": "LONG",
            "format": "1:MILLISECONDS:EPOCH",
            "granularity": "5:MINUTES",
            "dateTimeType": "PRIMARY"
        }],
        "ingestionModeConfig": {
            "ingestionMode": ingestion_mode,
            "primaryKey": primary_key,
            "offsetKey": offset_key
        }
    })
    .to_string()
}

/// Builder pre-loaded with every column kind, used as the prior schema in
/// compatibility tests
pub fn compat_builder() -> SchemaBuilder {
    SchemaBuilder::new()
        .add_single_value_dimension("svDimension", DataType::Int)
        .add_single_value_dimension_with_default("svDimensionWithDefault", DataType::Int, 10)
        .add_multi_value_dimension("mvDimension", DataType::String)
        .add_multi_value_dimension_with_default("mvDimensionWithDefault", DataType::String, "default")
        .add_metric("metric", DataType::Int)
        .add_metric_with_default("metricWithDefault", DataType::Int, 5)
}

/// [`compat_builder`] plus the given time unit and date-time format
pub fn compat_schema(time_unit: TimeUnit, date_time_format: &str) -> Schema {
    compat_builder()
        .add_time("time", time_unit, DataType::Long)
        .add_date_time("dateTime", DataType::Long, date_time_format, "1:HOURS")
        .build()
        .unwrap()
}
