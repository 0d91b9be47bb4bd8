//! Runtime values: the closed union every coercion consumes and produces.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::record::Record;
use crate::structured::StructuredValue;

/// A dynamically-typed value.
///
/// `Null` is the absent value; coercing it to any type yields `Null` again.
/// Composite arms (`List`, `Record`) only come from auto-typed JSON input and
/// are never produced by a scalar coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    /// Machine-width signed integer.
    Int(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    /// Machine-width unsigned integer.
    Uint(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// Decimal literal text, kept verbatim to preserve precision.
    Number(String),
    Binary(Vec<u8>),
    Time(DateTime<FixedOffset>),
    Date(NaiveDate),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Create a `Number` from decimal literal text.
    pub fn number(text: impl Into<String>) -> Self {
        Value::Number(text.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's runtime kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Int(_) => "int",
            Value::Uint8(_) => "uint8",
            Value::Uint16(_) => "uint16",
            Value::Uint32(_) => "uint32",
            Value::Uint64(_) => "uint64",
            Value::Uint(_) => "uint",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Binary(_) => "binary",
            Value::Time(_) => "time",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) | Value::Number(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// Render a float the way JSON producers do: plain decimal, switching to an
/// exponent only outside `[1e-6, 1e21)`.
pub(crate) fn format_f64(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

pub(crate) fn format_f32(value: f32) -> String {
    let magnitude = value.abs();
    if value.is_finite() && magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

pub(crate) fn format_time(time: &DateTime<FixedOffset>) -> String {
    time.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) | Value::Int(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) | Value::Uint(v) => write!(f, "{v}"),
            Value::Float32(v) => f.write_str(&format_f32(*v)),
            Value::Float64(v) => f.write_str(&format_f64(*v)),
            Value::String(text) | Value::Number(text) => f.write_str(text),
            Value::Binary(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Value::Time(time) => f.write_str(&format_time(time)),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Record(record) => write!(f, "{{{} fields}}", record.len()),
        }
    }
}

/// JSON encoding: binary as padded base64, time as RFC 3339 UTC, numbers bare.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int8(v) => serializer.serialize_i8(*v),
            Value::Int16(v) => serializer.serialize_i16(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Int64(v) | Value::Int(v) => serializer.serialize_i64(*v),
            Value::Uint8(v) => serializer.serialize_u8(*v),
            Value::Uint16(v) => serializer.serialize_u16(*v),
            Value::Uint32(v) => serializer.serialize_u32(*v),
            Value::Uint64(v) | Value::Uint(v) => serializer.serialize_u64(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::String(text) => serializer.serialize_str(text),
            Value::Number(text) => match serde_json::Number::from_str(text) {
                Ok(number) => number.serialize(serializer),
                Err(_) => serializer.serialize_str(text),
            },
            Value::Binary(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            Value::Time(time) => serializer.serialize_str(&format_time(time)),
            Value::Date(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

/// Name of a JSON value's kind, as used in [`crate::RecordError::NotARecord`].
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Auto-typed conversion from decoded JSON.
///
/// Numbers keep their literal text, objects become auto-typed records with
/// keys in source order.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(number) => Value::Number(number.to_string()),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (name, item) in map {
                    record.set(name, StructuredValue::auto(Value::from(item)));
                }
                Value::Record(record)
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Binary,
    DateTime<FixedOffset> => Time,
    NaiveDate => Date,
    Record => Record,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_f64(30.0), "30");
        assert_eq!(format_f64(0.1), "0.1");
        assert_eq!(format_f64(1e21), "1e21");
        assert_eq!(format_f64(1.5e-7), "1.5e-7");
        assert_eq!(format_f64(-2.5), "-2.5");
        assert_eq!(format_f32(0.1), "0.1");
    }

    #[test]
    fn test_serialize_scalars() {
        let json = |value: Value| serde_json::to_string(&value).unwrap();
        assert_eq!(json(Value::Null), "null");
        assert_eq!(json(Value::Bool(true)), "true");
        assert_eq!(json(Value::Int8(-3)), "-3");
        assert_eq!(json(Value::number("12345678901234567890123")), "12345678901234567890123");
        assert_eq!(json(Value::number("not a number")), "\"not a number\"");
        assert_eq!(json(Value::Binary(vec![1, 0, 0, 0, 0, 0, 0, 0])), "\"AQAAAAAAAAA=\"");
        assert_eq!(json(Value::from("a\"b")), r#""a\"b""#);
    }

    #[test]
    fn test_serialize_time_as_utc() {
        let time = DateTime::parse_from_rfc3339("1991-09-24T23:21:00+02:00").unwrap();
        assert_eq!(
            serde_json::to_string(&Value::Time(time)).unwrap(),
            "\"1991-09-24T21:21:00Z\""
        );
    }

    #[test]
    fn test_from_json_keeps_literal_and_order() {
        let parsed: serde_json::Value =
            serde_json::from_str(r#"{"z":1.50,"a":[true,null],"m":{"k":"v"}}"#).unwrap();
        let Value::Record(record) = Value::from(parsed) else {
            panic!("expected record");
        };
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(record.get("z").unwrap().raw(), &Value::number("1.50"));
        assert_eq!(
            record.get("a").unwrap().raw(),
            &Value::List(vec![Value::Bool(true), Value::Null])
        );
        assert_eq!(record.get("m").unwrap().raw().kind(), "record");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Binary(vec![0xde, 0xad]).to_string(), "0xdead");
        assert_eq!(Value::Float64(2.0).to_string(), "2");
        assert_eq!(Value::from(Some(5i32)).to_string(), "5");
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }
}
