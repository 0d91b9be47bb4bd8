//! Integer, float and boolean targets.

use chrono::NaiveTime;

use super::text::{IntLiteral, parse_int_literal};
use super::{Coercer, Result, codec_error, decode_exact};
use crate::error::CoercionError;
use crate::types::LogicalType;
use crate::value::Value;

/// A numeric source widened to one of three lossless carriers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Self> {
        let numeric = match *value {
            Value::Bool(v) => Numeric::Signed(i64::from(v)),
            Value::Int8(v) => Numeric::Signed(v.into()),
            Value::Int16(v) => Numeric::Signed(v.into()),
            Value::Int32(v) => Numeric::Signed(v.into()),
            Value::Int64(v) | Value::Int(v) => Numeric::Signed(v),
            Value::Uint8(v) => Numeric::Unsigned(v.into()),
            Value::Uint16(v) => Numeric::Unsigned(v.into()),
            Value::Uint32(v) => Numeric::Unsigned(v.into()),
            Value::Uint64(v) | Value::Uint(v) => Numeric::Unsigned(v),
            Value::Float32(v) => Numeric::Float(v.into()),
            Value::Float64(v) => Numeric::Float(v),
            _ => return None,
        };
        Some(numeric)
    }

    /// Map an exact integer literal onto a carrier, if it fits 64 bits.
    fn from_literal(literal: IntLiteral) -> Option<Self> {
        match literal {
            IntLiteral::Exact(v) => i64::try_from(v)
                .map(Numeric::Signed)
                .or_else(|_| u64::try_from(v).map(Numeric::Unsigned))
                .ok(),
            IntLiteral::TooLarge { .. } => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::Signed(v) => v as f64,
            Numeric::Unsigned(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }

    fn is_nonzero(self) -> bool {
        match self {
            Numeric::Signed(v) => v != 0,
            Numeric::Unsigned(v) => v != 0,
            Numeric::Float(v) => v != 0.0,
        }
    }

    /// Range-check against `[min, max]`; floats compare in floating point.
    fn to_signed(self, from: &'static str, to: LogicalType, min: i64, max: i64) -> Result<i64> {
        let overflow = |value: &dyn ToString| CoercionError::overflow(from, to, value.to_string());
        match self {
            Numeric::Signed(v) if (min..=max).contains(&v) => Ok(v),
            Numeric::Signed(v) => Err(overflow(&v)),
            Numeric::Unsigned(v) => i64::try_from(v)
                .ok()
                .filter(|v| *v <= max)
                .ok_or_else(|| overflow(&v)),
            Numeric::Float(v) if v.is_nan() || v < min as f64 || exceeds(v, max.into()) => {
                Err(overflow(&v))
            }
            Numeric::Float(v) => Ok(v as i64),
        }
    }

    fn to_unsigned(self, from: &'static str, to: LogicalType, max: u64) -> Result<u64> {
        let overflow = |value: &dyn ToString| CoercionError::overflow(from, to, value.to_string());
        match self {
            Numeric::Signed(v) => u64::try_from(v)
                .ok()
                .filter(|v| *v <= max)
                .ok_or_else(|| overflow(&v)),
            Numeric::Unsigned(v) if v <= max => Ok(v),
            Numeric::Unsigned(v) => Err(overflow(&v)),
            Numeric::Float(v) if v.is_nan() || v < 0.0 || exceeds(v, max.into()) => {
                Err(overflow(&v))
            }
            Numeric::Float(v) => Ok(v as u64),
        }
    }
}

/// True when `v` lies above `max`.
///
/// `i64::MAX` and `u64::MAX` round up to the next power of two as `f64`; that
/// rounded bound is itself out of range.
fn exceeds(v: f64, max: i128) -> bool {
    let bound = max as f64;
    if bound as i128 > max { v >= bound } else { v > bound }
}

/// Parse a decimal float literal. `NaN` and infinity spellings are rejected.
fn parse_float_literal(text: &str) -> Option<f64> {
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

/// A float from text; literals beyond the `f64` range overflow.
fn float_from_text(text: String, from: &'static str, to: LogicalType) -> Result<f64> {
    match parse_float_literal(&text) {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(CoercionError::overflow(from, to, text)),
        None => Err(CoercionError::parse_failure(text, to)),
    }
}

/// Narrow to `f32`; finite values beyond its range overflow.
fn narrow_f32(v: f64, from: &'static str) -> Result<f32> {
    let narrowed = v as f32;
    if v.is_finite() && !narrowed.is_finite() {
        return Err(CoercionError::overflow(from, LogicalType::Float32, v));
    }
    Ok(narrowed)
}

/// Parse an integer literal for an integer target.
fn integer_from_text(text: &str, from: &'static str, to: LogicalType) -> Result<Numeric> {
    match parse_int_literal(text) {
        Some(literal) => {
            Numeric::from_literal(literal).ok_or_else(|| CoercionError::overflow(from, to, text))
        }
        None => Err(CoercionError::parse_failure(text, to)),
    }
}

impl Coercer {
    pub(super) fn to_signed(
        &self,
        value: Value,
        to: LogicalType,
        min: i64,
        max: i64,
    ) -> Result<i64> {
        let from = value.kind();
        let numeric = match value {
            Value::String(text) | Value::Number(text) => integer_from_text(&text, from, to)?,
            Value::Binary(bytes) => return self.signed_from_binary(&bytes, to),
            other => Numeric::of(&other).ok_or_else(|| CoercionError::unsupported(from, to))?,
        };
        numeric.to_signed(from, to, min, max)
    }

    pub(super) fn to_unsigned(&self, value: Value, to: LogicalType, max: u64) -> Result<u64> {
        let from = value.kind();
        let numeric = match value {
            Value::String(text) | Value::Number(text) => integer_from_text(&text, from, to)?,
            Value::Binary(bytes) => return self.unsigned_from_binary(&bytes, to),
            other => Numeric::of(&other).ok_or_else(|| CoercionError::unsupported(from, to))?,
        };
        numeric.to_unsigned(from, to, max)
    }

    /// Two's-complement little-endian, exactly as wide as the target.
    fn signed_from_binary(&self, bytes: &[u8], to: LogicalType) -> Result<i64> {
        match to {
            LogicalType::Int8 => decode_exact::<i8>(bytes, to).map(i64::from),
            LogicalType::Int16 => decode_exact::<i16>(bytes, to).map(i64::from),
            LogicalType::Int32 => decode_exact::<i32>(bytes, to).map(i64::from),
            LogicalType::Int64 => decode_exact::<i64>(bytes, to),
            _ => self
                .options
                .machine_width
                .decode_int(bytes)
                .map_err(|err| codec_error(err, to)),
        }
    }

    fn unsigned_from_binary(&self, bytes: &[u8], to: LogicalType) -> Result<u64> {
        match to {
            LogicalType::Uint8 => decode_exact::<u8>(bytes, to).map(u64::from),
            LogicalType::Uint16 => decode_exact::<u16>(bytes, to).map(u64::from),
            LogicalType::Uint32 => decode_exact::<u32>(bytes, to).map(u64::from),
            LogicalType::Uint64 => decode_exact::<u64>(bytes, to),
            _ => self
                .options
                .machine_width
                .decode_uint(bytes)
                .map_err(|err| codec_error(err, to)),
        }
    }
}

/// IEEE-754 little-endian from 4 or 8 bytes.
fn float_from_binary(bytes: &[u8], to: LogicalType, expected: usize) -> Result<f64> {
    match bytes.len() {
        4 => decode_exact::<f32>(bytes, to).map(f64::from),
        8 => decode_exact::<f64>(bytes, to),
        actual => Err(CoercionError::InvalidBinaryWidth {
            to,
            expected,
            actual,
        }),
    }
}

pub(super) fn to_float64(value: Value) -> Result<f64> {
    let to = LogicalType::Float64;
    let from = value.kind();
    match value {
        Value::String(text) | Value::Number(text) => float_from_text(text, from, to),
        Value::Binary(bytes) => float_from_binary(&bytes, to, 8),
        other => Numeric::of(&other)
            .map(Numeric::as_f64)
            .ok_or_else(|| CoercionError::unsupported(from, to)),
    }
}

pub(super) fn to_float32(value: Value) -> Result<f32> {
    let to = LogicalType::Float32;
    let from = value.kind();
    match value {
        Value::Float32(v) => Ok(v),
        Value::String(text) | Value::Number(text) => {
            narrow_f32(float_from_text(text, from, to)?, from)
        }
        Value::Binary(bytes) if bytes.len() == 4 => decode_exact::<f32>(&bytes, to),
        Value::Binary(bytes) => narrow_f32(float_from_binary(&bytes, to, 4)?, from),
        other => Numeric::of(&other)
            .ok_or_else(|| CoercionError::unsupported(from, to))
            .and_then(|n| narrow_f32(n.as_f64(), from)),
    }
}

/// Nonzero is true; text must be `true`, `false` or a numeric literal.
pub(super) fn to_bool(value: Value) -> Result<bool> {
    let to = LogicalType::Bool;
    let from = value.kind();
    match value {
        Value::Bool(v) => Ok(v),
        Value::String(text) | Value::Number(text) => bool_from_text(text),
        Value::Time(time) => Ok(time.timestamp() != 0 || time.timestamp_subsec_nanos() != 0),
        Value::Date(date) => Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp() != 0),
        other => Numeric::of(&other)
            .map(Numeric::is_nonzero)
            .ok_or_else(|| CoercionError::unsupported(from, to)),
    }
}

fn bool_from_text(text: String) -> Result<bool> {
    match text.as_str() {
        "true" => return Ok(true),
        "false" => return Ok(false),
        _ => {}
    }
    match parse_int_literal(&text) {
        Some(IntLiteral::Exact(v)) => return Ok(v != 0),
        Some(IntLiteral::TooLarge { .. }) => return Ok(true),
        None => {}
    }
    match parse_float_literal(&text) {
        Some(v) => Ok(v != 0.0),
        None => Err(CoercionError::parse_failure(text, LogicalType::Bool)),
    }
}
