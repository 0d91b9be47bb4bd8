//! `time`, `date` and `timestamp` targets, plus time rendering for `string`.
//!
//! Text is parsed against the configured format first and retried as integer
//! Unix seconds before failing. Binary input is tried as UTF-8 text, then as
//! an 8-byte little-endian `int64` of seconds.

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::text::{IntLiteral, parse_int_literal};
use super::{Coercer, Result, decode_exact};
use crate::error::CoercionError;
use crate::types::LogicalType;
use crate::value::{Value, format_time};

/// The instant at midnight UTC on `date`.
pub(crate) fn midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn from_seconds(seconds: i128, from: &'static str, to: LogicalType) -> Result<DateTime<FixedOffset>> {
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .map(|time| time.fixed_offset())
        .ok_or_else(|| CoercionError::overflow(from, to, seconds))
}

/// Write through `Display`, surfacing invalid format strings as errors.
fn render(formatted: impl fmt::Display, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{formatted}")
        .map_err(|_| CoercionError::parse_failure(format, LogicalType::String))?;
    Ok(out)
}

impl Coercer {
    pub(super) fn to_time(&self, value: Value, to: LogicalType) -> Result<DateTime<FixedOffset>> {
        let from = value.kind();
        match value {
            Value::Time(time) => Ok(time),
            Value::Date(date) => Ok(midnight(date)),
            Value::String(text) | Value::Number(text) => self.time_from_text(&text, from, to),
            Value::Binary(bytes) => self.time_from_binary(&bytes, to),
            Value::Int8(v) => from_seconds(v.into(), from, to),
            Value::Int16(v) => from_seconds(v.into(), from, to),
            Value::Int32(v) => from_seconds(v.into(), from, to),
            Value::Int64(v) | Value::Int(v) => from_seconds(v.into(), from, to),
            Value::Uint8(v) => from_seconds(v.into(), from, to),
            Value::Uint16(v) => from_seconds(v.into(), from, to),
            Value::Uint32(v) => from_seconds(v.into(), from, to),
            Value::Uint64(v) | Value::Uint(v) => from_seconds(v.into(), from, to),
            Value::Null
            | Value::Bool(_)
            | Value::Float32(_)
            | Value::Float64(_)
            | Value::List(_)
            | Value::Record(_) => Err(CoercionError::unsupported(from, to)),
        }
    }

    pub(super) fn to_date(&self, value: Value) -> Result<NaiveDate> {
        if let Value::Date(date) = value {
            return Ok(date);
        }
        let text = match &value {
            Value::String(text) | Value::Number(text) => Some(text.as_str()),
            Value::Binary(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        };
        if let Some(date) =
            text.and_then(|text| NaiveDate::parse_from_str(text, &self.options.date_format).ok())
        {
            return Ok(date);
        }
        self.to_time(value, LogicalType::Date)
            .map(|time| time.with_timezone(&Utc).date_naive())
    }

    fn parse_time_text(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        match &self.options.datetime_format {
            None => DateTime::parse_from_rfc3339(text).ok(),
            Some(format) => DateTime::parse_from_str(text, format).ok().or_else(|| {
                NaiveDateTime::parse_from_str(text, format)
                    .ok()
                    .map(|naive| naive.and_utc().fixed_offset())
            }),
        }
    }

    fn time_from_text(
        &self,
        text: &str,
        from: &'static str,
        to: LogicalType,
    ) -> Result<DateTime<FixedOffset>> {
        if let Some(time) = self.parse_time_text(text) {
            return Ok(time);
        }
        match parse_int_literal(text) {
            Some(IntLiteral::Exact(seconds)) => from_seconds(seconds, from, to),
            Some(IntLiteral::TooLarge { .. }) => Err(CoercionError::overflow(from, to, text)),
            None => Err(CoercionError::parse_failure(text, to)),
        }
    }

    fn time_from_binary(&self, bytes: &[u8], to: LogicalType) -> Result<DateTime<FixedOffset>> {
        let text = std::str::from_utf8(bytes).ok();
        if let Some(text) = text {
            if let Some(time) = self.parse_time_text(text) {
                return Ok(time);
            }
            if let Some(IntLiteral::Exact(seconds)) = parse_int_literal(text) {
                return from_seconds(seconds, "binary", to);
            }
        }
        match text {
            Some(text) if bytes.len() != 8 => Err(CoercionError::parse_failure(text, to)),
            _ => {
                let seconds = decode_exact::<i64>(bytes, to)?;
                from_seconds(seconds.into(), "binary", to)
            }
        }
    }

    /// RFC 3339 in UTC unless a datetime format is configured.
    pub(super) fn render_time(&self, time: &DateTime<FixedOffset>) -> Result<String> {
        match &self.options.datetime_format {
            None => Ok(format_time(time)),
            Some(format) => render(time.with_timezone(&Utc).format(format), format),
        }
    }

    pub(super) fn render_date(&self, date: &NaiveDate) -> Result<String> {
        let format = &self.options.date_format;
        render(date.format(format), format)
    }
}
