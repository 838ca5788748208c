//! Typed default null values and the per-type default policy
//!
//! The default null value is what ingestion substitutes when a row has no
//! value for a column. It always carries the column's data type; values
//! supplied in another shape are coerced once, at construction.

use crate::data_type::{DataType, FieldType};
use crate::error::SchemaError;
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Default used for STRING columns when none is declared
pub const DEFAULT_STRING_NULL_VALUE: &str = "null";

/// A default null value, one variant per [`DataType`]
///
/// Floating point variants compare and hash by bit pattern.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Bytes(Vec<u8>),
}

impl DefaultValue {
    /// Default for a column of the given kind and type when none is declared
    ///
    /// Metrics default to the zero value of their type; every other kind
    /// defaults to the minimum sentinel of the type.
    pub fn for_field(field_type: FieldType, data_type: DataType) -> Self {
        match (field_type, data_type) {
            (FieldType::Metric, DataType::Int) => Self::Int(0),
            (FieldType::Metric, DataType::Long) => Self::Long(0),
            (FieldType::Metric, DataType::Float) => Self::Float(0.0),
            (FieldType::Metric, DataType::Double) => Self::Double(0.0),
            (_, DataType::Int) => Self::Int(i32::MIN),
            (_, DataType::Long) => Self::Long(i64::MIN),
            (_, DataType::Float) => Self::Float(f32::NEG_INFINITY),
            (_, DataType::Double) => Self::Double(f64::NEG_INFINITY),
            (_, DataType::Boolean) => Self::Boolean(false),
            (_, DataType::String) => Self::String(DEFAULT_STRING_NULL_VALUE.to_string()),
            (_, DataType::Bytes) => Self::Bytes(Vec::new()),
        }
    }

    /// Data type this value belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Long(_) => DataType::Long,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::Boolean(_) => DataType::Boolean,
            Self::String(_) => DataType::String,
            Self::Bytes(_) => DataType::Bytes,
        }
    }

    /// Convert this value to `data_type`
    ///
    /// Numbers widen freely and narrow only when in range, strings are
    /// parsed, and BYTES accept hex-encoded strings. A finite input never
    /// becomes an infinite default.
    pub fn coerce(self, data_type: DataType) -> Result<Self, SchemaError> {
        if self.data_type() == data_type {
            return Ok(self);
        }

        let coerced = match (data_type, &self) {
            (DataType::Int, Self::Long(v)) => i32::try_from(*v).ok().map(Self::Int),
            (DataType::Int, Self::String(s)) => s.trim().parse().ok().map(Self::Int),

            (DataType::Long, Self::Int(v)) => Some(Self::Long(i64::from(*v))),
            (DataType::Long, Self::String(s)) => s.trim().parse().ok().map(Self::Long),

            (DataType::Float, Self::Int(v)) => Some(Self::Float(*v as f32)),
            (DataType::Float, Self::Long(v)) => Some(Self::Float(*v as f32)),
            (DataType::Float, Self::Double(v)) => narrow_to_f32(*v).map(Self::Float),
            (DataType::Float, Self::String(s)) => parse_float(s).map(Self::Float),

            (DataType::Double, Self::Int(v)) => Some(Self::Double(f64::from(*v))),
            (DataType::Double, Self::Long(v)) => Some(Self::Double(*v as f64)),
            (DataType::Double, Self::Float(v)) => Some(Self::Double(f64::from(*v))),
            (DataType::Double, Self::String(s)) => parse_float(s).map(Self::Double),

            (DataType::Boolean, Self::Int(v)) => int_to_bool(i64::from(*v)).map(Self::Boolean),
            (DataType::Boolean, Self::Long(v)) => int_to_bool(*v).map(Self::Boolean),
            (DataType::Boolean, Self::String(s)) => parse_bool(s).map(Self::Boolean),

            (DataType::String, Self::Bytes(_)) => None,
            (DataType::String, other) => Some(Self::String(other.to_string())),

            (DataType::Bytes, Self::String(s)) => hex::decode(s.trim()).ok().map(Self::Bytes),

            _ => None,
        };

        coerced.ok_or_else(|| SchemaError::InvalidDefaultValue {
            data_type,
            value: self.to_string(),
            reason: format!("cannot convert a {} value", self.data_type()),
        })
    }

    /// Read a default from its JSON form and coerce it to `data_type`
    pub fn from_json(data_type: DataType, value: &Value) -> Result<Self, SchemaError> {
        let raw = match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(v), _) => Self::Long(v),
                (None, Some(v)) => Self::Double(v),
                (None, None) => {
                    return Err(SchemaError::InvalidDefaultValue {
                        data_type,
                        value: n.to_string(),
                        reason: "number is not representable".to_string(),
                    })
                }
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Bool(b) => Self::Boolean(*b),
            other => {
                return Err(SchemaError::InvalidDefaultValue {
                    data_type,
                    value: other.to_string(),
                    reason: "expected a JSON scalar".to_string(),
                })
            }
        };

        raw.coerce(data_type)
    }

    /// JSON form: finite numbers as numbers, non-finite as strings, BYTES as hex
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(v) => Value::from(*v),
            Self::Long(v) => Value::from(*v),
            Self::Float(v) => float_to_json(f64::from(*v)),
            Self::Double(v) => float_to_json(*v),
            Self::Boolean(v) => Value::Bool(*v),
            Self::String(v) => Value::String(v.clone()),
            Self::Bytes(v) => Value::String(hex::encode(v)),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

fn int_to_bool(v: i64) -> Option<bool> {
    match v {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn narrow_to_f32(v: f64) -> Option<f32> {
    let narrowed = v as f32;
    (narrowed.is_finite() || !v.is_finite()).then_some(narrowed)
}

/// Parse a float, rejecting finite literals that overflow to infinity
fn parse_float<T>(s: &str) -> Option<T>
where
    T: FromStr + Into<f64> + Copy,
{
    let s = s.trim();
    let v: T = s.parse().ok()?;
    (Into::<f64>::into(v).is_finite() || is_non_finite_token(s)).then_some(v)
}

fn is_non_finite_token(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(unsigned.as_str(), "inf" | "infinity" | "nan")
}

fn float_to_json(v: f64) -> Value {
    if v.is_nan() {
        Value::String("NaN".to_string())
    } else if v.is_infinite() {
        let token = if v > 0.0 { "Infinity" } else { "-Infinity" };
        Value::String(token.to_string())
    } else {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DefaultValue {}

impl Hash for DefaultValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Boolean(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{}", v),
            Self::Bytes(v) => write!(f, "{}", hex::encode(v)),
        }
    }
}

impl From<i32> for DefaultValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for DefaultValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for DefaultValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for DefaultValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for DefaultValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for DefaultValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for DefaultValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}
