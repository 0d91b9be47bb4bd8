//! Literal grammars and the `string`/`number` targets.

use super::{Coercer, Result};
use crate::error::CoercionError;
use crate::types::LogicalType;
use crate::value::{Value, format_f32, format_f64};

/// An integer literal parsed without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntLiteral {
    Exact(i128),
    /// Syntactically valid but wider than 128 bits.
    TooLarge { negative: bool },
}

/// Parse a base-10, `0x` or `0o` integer literal with an optional sign.
///
/// Returns `None` when `text` is not an integer literal at all.
pub(crate) fn parse_int_literal(text: &str) -> Option<IntLiteral> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = if let Some(rest) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = body
        .strip_prefix("0o")
        .or_else(|| body.strip_prefix("0O"))
    {
        (8, rest)
    } else {
        (10, body)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let Ok(magnitude) = u128::from_str_radix(digits, radix) else {
        return Some(IntLiteral::TooLarge { negative });
    };
    let Ok(magnitude) = i128::try_from(magnitude) else {
        return Some(IntLiteral::TooLarge { negative });
    };
    Some(IntLiteral::Exact(if negative {
        -magnitude
    } else {
        magnitude
    }))
}

/// True when `text` matches the JSON number grammar exactly.
pub(crate) fn is_json_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let digits = |pos: &mut usize| {
        let start = *pos;
        while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
            *pos += 1;
        }
        *pos - start
    };

    if bytes.first() == Some(&b'-') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'0') => pos += 1,
        Some(b'1'..=b'9') => {
            digits(&mut pos);
        }
        _ => return false,
    }
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        if digits(&mut pos) == 0 {
            return false;
        }
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        if digits(&mut pos) == 0 {
            return false;
        }
    }
    pos == bytes.len()
}

/// Canonical decimal text, keeping the source's full precision.
pub(super) fn to_number(value: Value) -> Result<String> {
    let to = LogicalType::Number;
    let from = value.kind();
    match value {
        Value::Bool(v) => Ok(if v { "1" } else { "0" }.to_string()),
        Value::Int8(v) => Ok(v.to_string()),
        Value::Int16(v) => Ok(v.to_string()),
        Value::Int32(v) => Ok(v.to_string()),
        Value::Int64(v) | Value::Int(v) => Ok(v.to_string()),
        Value::Uint8(v) => Ok(v.to_string()),
        Value::Uint16(v) => Ok(v.to_string()),
        Value::Uint32(v) => Ok(v.to_string()),
        Value::Uint64(v) | Value::Uint(v) => Ok(v.to_string()),
        Value::Float32(v) if v.is_finite() => Ok(format_f32(v)),
        Value::Float64(v) if v.is_finite() => Ok(format_f64(v)),
        Value::Float32(v) => Err(CoercionError::overflow(from, to, v)),
        Value::Float64(v) => Err(CoercionError::overflow(from, to, v)),
        Value::String(text) | Value::Number(text) => number_from_text(text),
        Value::Binary(bytes) => String::from_utf8(bytes)
            .map_err(|err| {
                CoercionError::parse_failure(String::from_utf8_lossy(err.as_bytes()), to)
            })
            .and_then(number_from_text),
        Value::Null | Value::Time(_) | Value::Date(_) | Value::List(_) | Value::Record(_) => {
            Err(CoercionError::unsupported(from, to))
        }
    }
}

fn number_from_text(text: String) -> Result<String> {
    if is_json_number(&text) {
        return Ok(text);
    }
    if let Some(IntLiteral::Exact(v)) = parse_int_literal(&text) {
        return Ok(v.to_string());
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(format_f64(v)),
        _ => Err(CoercionError::parse_failure(text, LogicalType::Number)),
    }
}

impl Coercer {
    pub(super) fn to_string(&self, value: Value) -> Result<String> {
        let to = LogicalType::String;
        let from = value.kind();
        match value {
            Value::Bool(v) => Ok(v.to_string()),
            Value::Int8(v) => Ok(v.to_string()),
            Value::Int16(v) => Ok(v.to_string()),
            Value::Int32(v) => Ok(v.to_string()),
            Value::Int64(v) | Value::Int(v) => Ok(v.to_string()),
            Value::Uint8(v) => Ok(v.to_string()),
            Value::Uint16(v) => Ok(v.to_string()),
            Value::Uint32(v) => Ok(v.to_string()),
            Value::Uint64(v) | Value::Uint(v) => Ok(v.to_string()),
            Value::Float32(v) => Ok(format_f32(v)),
            Value::Float64(v) => Ok(format_f64(v)),
            Value::String(text) | Value::Number(text) => Ok(text),
            Value::Binary(bytes) => String::from_utf8(bytes).map_err(|err| {
                CoercionError::parse_failure(String::from_utf8_lossy(err.as_bytes()), to)
            }),
            Value::Time(time) => self.render_time(&time),
            Value::Date(date) => self.render_date(&date),
            Value::Null | Value::List(_) | Value::Record(_) => {
                Err(CoercionError::unsupported(from, to))
            }
        }
    }
}
