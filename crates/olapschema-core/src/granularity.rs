//! Time granularity and date-time format specifications
//!
//! Format strings follow `<size>:<unit>[:<EPOCH|SIMPLE_DATE_FORMAT:pattern>]`,
//! e.g. `1:MILLISECONDS:EPOCH`, `1:DAYS:SIMPLE_DATE_FORMAT:yyyyMMdd` and
//! `5:MINUTES`.

use crate::data_type::{DataType, TimeUnit};
use crate::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static DATE_TIME_FORMAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):([A-Za-z]+):(EPOCH|SIMPLE_DATE_FORMAT(?::.*)?)$").unwrap()
});

static DATE_TIME_GRANULARITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):([A-Za-z]+)$").unwrap());

const SIMPLE_DATE_FORMAT_PREFIX: &str = "SIMPLE_DATE_FORMAT";

/// How time values are encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeFormat {
    /// Count of units since the unix epoch
    #[default]
    Epoch,

    /// Formatted string following a date pattern such as `yyyyMMdd`
    SimpleDateFormat(String),
}

impl TimeFormat {
    pub fn is_epoch(&self) -> bool {
        matches!(self, Self::Epoch)
    }

    /// Date pattern for simple-date-format values
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Epoch => None,
            Self::SimpleDateFormat(pattern) => Some(pattern),
        }
    }
}

impl std::fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epoch => write!(f, "EPOCH"),
            Self::SimpleDateFormat(pattern) => {
                write!(f, "{}:{}", SIMPLE_DATE_FORMAT_PREFIX, pattern)
            }
        }
    }
}

impl FromStr for TimeFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "EPOCH" {
            return Ok(Self::Epoch);
        }

        match s.strip_prefix(SIMPLE_DATE_FORMAT_PREFIX) {
            Some(rest) => match rest.strip_prefix(':') {
                Some(pattern) if !pattern.is_empty() => {
                    Ok(Self::SimpleDateFormat(pattern.to_string()))
                }
                _ => Err(SchemaError::invalid_format(
                    s,
                    "SIMPLE_DATE_FORMAT requires a pattern",
                )),
            },
            None => Err(SchemaError::invalid_format(
                s,
                "expected EPOCH or SIMPLE_DATE_FORMAT:<pattern>",
            )),
        }
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeFormat> for String {
    fn from(value: TimeFormat) -> Self {
        value.to_string()
    }
}

fn default_time_unit_size() -> u32 {
    1
}

fn is_unit_size_default(size: &u32) -> bool {
    *size == 1
}

/// Granularity of one side (incoming or outgoing) of a time column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGranularitySpec {
    /// Column name carrying this granularity
    pub name: String,

    /// Stored data type
    pub data_type: DataType,

    /// Unit of one tick
    pub time_type: TimeUnit,

    /// Number of units per tick
    #[serde(
        default = "default_time_unit_size",
        skip_serializing_if = "is_unit_size_default"
    )]
    pub time_unit_size: u32,

    /// Value encoding
    #[serde(default, skip_serializing_if = "TimeFormat::is_epoch")]
    pub time_format: TimeFormat,
}

impl TimeGranularitySpec {
    /// Epoch-encoded granularity
    pub fn new(
        data_type: DataType,
        time_unit_size: u32,
        time_type: TimeUnit,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            time_type,
            time_unit_size,
            time_format: TimeFormat::Epoch,
        }
    }

    /// Granularity with an explicit format string (`EPOCH` or
    /// `SIMPLE_DATE_FORMAT:<pattern>`)
    pub fn with_format(
        data_type: DataType,
        time_unit_size: u32,
        time_type: TimeUnit,
        time_format: &str,
        name: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            time_format: time_format.parse()?,
            ..Self::new(data_type, time_unit_size, time_type, name)
        })
    }

    /// Reject granularities that can never describe a time column
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }
        if self.time_unit_size == 0 {
            return Err(SchemaError::invalid_format(
                format!("{}:{}", self.time_unit_size, self.time_type),
                format!("time unit size of '{}' must be positive", self.name),
            ));
        }
        Ok(())
    }
}

/// `<size>:<unit>:<EPOCH|SIMPLE_DATE_FORMAT:pattern>` format of a date-time column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateTimeFormatSpec {
    pub size: u32,
    pub unit: TimeUnit,
    pub time_format: TimeFormat,
}

impl std::fmt::Display for DateTimeFormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.size, self.unit, self.time_format)
    }
}

impl FromStr for DateTimeFormatSpec {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = DATE_TIME_FORMAT_REGEX.captures(s).ok_or_else(|| {
            SchemaError::invalid_format(
                s,
                "expected <size>:<unit>:<EPOCH|SIMPLE_DATE_FORMAT:pattern>",
            )
        })?;

        Ok(Self {
            size: parse_size(s, &captures[1])?,
            unit: parse_unit(s, &captures[2])?,
            time_format: captures[3].parse()?,
        })
    }
}

impl TryFrom<String> for DateTimeFormatSpec {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateTimeFormatSpec> for String {
    fn from(value: DateTimeFormatSpec) -> Self {
        value.to_string()
    }
}

/// `<size>:<unit>` bucketing granularity of a date-time column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateTimeGranularitySpec {
    pub size: u32,
    pub unit: TimeUnit,
}

impl DateTimeGranularitySpec {
    /// Bucket width in milliseconds
    pub fn to_millis(&self) -> u64 {
        u64::from(self.size) * self.unit.to_millis()
    }
}

impl std::fmt::Display for DateTimeGranularitySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.size, self.unit)
    }
}

impl FromStr for DateTimeGranularitySpec {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = DATE_TIME_GRANULARITY_REGEX
            .captures(s)
            .ok_or_else(|| SchemaError::invalid_format(s, "expected <size>:<unit>"))?;

        Ok(Self {
            size: parse_size(s, &captures[1])?,
            unit: parse_unit(s, &captures[2])?,
        })
    }
}

impl TryFrom<String> for DateTimeGranularitySpec {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateTimeGranularitySpec> for String {
    fn from(value: DateTimeGranularitySpec) -> Self {
        value.to_string()
    }
}

/// Role of a date-time column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeType {
    Primary,
    Secondary,
    Derived,
}

impl DateTimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
            Self::Derived => "DERIVED",
        }
    }
}

impl std::fmt::Display for DateTimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn parse_size(input: &str, raw: &str) -> Result<u32, SchemaError> {
    match raw.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(SchemaError::invalid_format(
            input,
            "size must be a positive integer",
        )),
    }
}

fn parse_unit(input: &str, raw: &str) -> Result<TimeUnit, SchemaError> {
    raw.parse()
        .map_err(|reason: String| SchemaError::invalid_format(input, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_epoch_format() {
        let spec: DateTimeFormatSpec = "1:MILLISECONDS:EPOCH".parse().unwrap();
        assert_eq!(spec.size, 1);
        assert_eq!(spec.unit, TimeUnit::Milliseconds);
        assert_eq!(spec.time_format, TimeFormat::Epoch);
        assert_eq!(spec.to_string(), "1:MILLISECONDS:EPOCH");
    }

    #[test]
    fn parse_simple_date_format_with_colons() {
        let spec: DateTimeFormatSpec = "1:SECONDS:SIMPLE_DATE_FORMAT:yyyy-MM-dd HH:mm:ss"
            .parse()
            .unwrap();
        assert_eq!(spec.time_format.pattern(), Some("yyyy-MM-dd HH:mm:ss"));
        assert_eq!(
            spec.to_string(),
            "1:SECONDS:SIMPLE_DATE_FORMAT:yyyy-MM-dd HH:mm:ss"
        );
    }

    #[test]
    fn reject_malformed_formats() {
        assert!("HOURS:EPOCH".parse::<DateTimeFormatSpec>().is_err());
        assert!("0:HOURS:EPOCH".parse::<DateTimeFormatSpec>().is_err());
        assert!("1:FORTNIGHTS:EPOCH".parse::<DateTimeFormatSpec>().is_err());
        assert!("1:HOURS:ISO".parse::<DateTimeFormatSpec>().is_err());
        assert!("1:DAYS:SIMPLE_DATE_FORMAT".parse::<DateTimeFormatSpec>().is_err());
    }

    #[test]
    fn parse_granularity() {
        let spec: DateTimeGranularitySpec = "5:MINUTES".parse().unwrap();
        assert_eq!(spec.to_millis(), 300_000);
        assert!("5".parse::<DateTimeGranularitySpec>().is_err());
        assert!("-5:MINUTES".parse::<DateTimeGranularitySpec>().is_err());
    }

    #[test]
    fn time_granularity_json_omits_defaults() {
        let spec = TimeGranularitySpec::new(DataType::Long, 1, TimeUnit::Days, "time");
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"name":"time","dataType":"LONG","timeType":"DAYS"}"#);

        let parsed: TimeGranularitySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn time_granularity_with_simple_date_format() {
        let spec = TimeGranularitySpec::with_format(
            DataType::String,
            1,
            TimeUnit::Days,
            "SIMPLE_DATE_FORMAT:yyyyMMdd",
            "Date",
        )
        .unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains(r#""timeFormat":"SIMPLE_DATE_FORMAT:yyyyMMdd""#));
        assert_eq!(serde_json::from_str::<TimeGranularitySpec>(&json).unwrap(), spec);
    }

    #[test]
    fn zero_unit_size_is_rejected() {
        let spec = TimeGranularitySpec::new(DataType::Long, 0, TimeUnit::Days, "time");
        assert!(spec.check().is_err());
    }
}
