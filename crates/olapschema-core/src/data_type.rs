//! Column data types, field kinds and time units

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stored data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Bytes,
}

impl DataType {
    /// Stable upper-case token used in the JSON form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
        }
    }

    /// Whether values of this type are numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Float | Self::Double)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INT" => Ok(Self::Int),
            "LONG" => Ok(Self::Long),
            "FLOAT" => Ok(Self::Float),
            "DOUBLE" => Ok(Self::Double),
            "BOOLEAN" => Ok(Self::Boolean),
            "STRING" => Ok(Self::String),
            "BYTES" => Ok(Self::Bytes),
            other => Err(format!("unknown data type '{}'", other)),
        }
    }
}

/// Role a column plays in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Dimension,
    Metric,
    Time,
    DateTime,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dimension => "DIMENSION",
            Self::Metric => "METRIC",
            Self::Time => "TIME",
            Self::DateTime => "DATE_TIME",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of a time or date-time column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nanoseconds => "NANOSECONDS",
            Self::Microseconds => "MICROSECONDS",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }

    /// Length of one unit in milliseconds (zero for sub-millisecond units)
    pub fn to_millis(&self) -> u64 {
        match self {
            Self::Nanoseconds | Self::Microseconds => 0,
            Self::Milliseconds => 1,
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NANOSECONDS" => Ok(Self::Nanoseconds),
            "MICROSECONDS" => Ok(Self::Microseconds),
            "MILLISECONDS" => Ok(Self::Milliseconds),
            "SECONDS" => Ok(Self::Seconds),
            "MINUTES" => Ok(Self::Minutes),
            "HOURS" => Ok(Self::Hours),
            "DAYS" => Ok(Self::Days),
            other => Err(format!("unknown time unit '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_tokens_are_stable() {
        assert_eq!(DataType::Int.to_string(), "INT");
        assert_eq!(DataType::Bytes.as_str(), "BYTES");
        assert_eq!(
            serde_json::to_string(&DataType::Boolean).unwrap(),
            "\"BOOLEAN\""
        );
    }

    #[test]
    fn data_type_parsing_is_case_insensitive() {
        assert_eq!("long".parse::<DataType>().unwrap(), DataType::Long);
        assert!("DECIMAL".parse::<DataType>().is_err());
    }

    #[test]
    fn field_type_serializes_with_underscore() {
        assert_eq!(
            serde_json::to_string(&FieldType::DateTime).unwrap(),
            "\"DATE_TIME\""
        );
    }

    #[test]
    fn time_unit_round_trip() {
        for unit in [TimeUnit::Milliseconds, TimeUnit::Hours, TimeUnit::Days] {
            assert_eq!(unit.as_str().parse::<TimeUnit>().unwrap(), unit);
        }
        assert_eq!(TimeUnit::Hours.to_millis(), 3_600_000);
    }
}
