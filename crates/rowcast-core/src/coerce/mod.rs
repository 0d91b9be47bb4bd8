//! The coercion engine.
//!
//! [`Coercer::coerce`] converts any [`Value`] into a requested [`LogicalType`]
//! or fails with a typed [`CoercionError`]. Conversions are pure; a `Coercer`
//! holds only immutable configuration and can be shared across threads.
//!
//! | Target              | Accepted sources                                                  |
//! |---------------------|-------------------------------------------------------------------|
//! | signed/unsigned int | numeric, bool, string/number literal, exact-width binary          |
//! | float32/float64     | numeric, bool, string/number literal, 4- or 8-byte binary         |
//! | bool                | numeric (nonzero), bool, `true`/`false` or numeric text, time     |
//! | string              | numeric, bool, string, number, UTF-8 binary, time, date           |
//! | number              | numeric, bool, numeric text, UTF-8 binary                         |
//! | binary              | numeric (fixed width LE), bool, text (UTF-8), time (unix seconds) |
//! | time/date/timestamp | formatted text or integer seconds, integers, time, date, binary   |
//!
//! `Null` converts to `Null` for every target.

mod numeric;
mod text;
mod time;

use std::sync::{Arc, LazyLock};

use rowcast_binary::{CodecError, FixedWidth, MachineWidth, encode};

use crate::error::CoercionError;
use crate::types::LogicalType;
use crate::value::Value;

type Result<T> = std::result::Result<T, CoercionError>;

/// Explicit configuration for the coercion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceOptions {
    /// Width of the machine `int`/`uint` types (default: 64-bit).
    pub machine_width: MachineWidth,
    /// chrono format for `time` text; `None` means RFC 3339.
    pub datetime_format: Option<String>,
    /// chrono format for `date` text (default: `%Y-%m-%d`).
    pub date_format: String,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            machine_width: MachineWidth::W64,
            datetime_format: None,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl CoerceOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine integer width.
    #[must_use]
    pub fn with_machine_width(mut self, width: MachineWidth) -> Self {
        self.machine_width = width;
        self
    }

    /// Set a custom datetime format (RFC 3339 when `None`).
    #[must_use]
    pub fn with_datetime_format(mut self, format: Option<String>) -> Self {
        self.datetime_format = format;
        self
    }

    /// Set the date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

static DEFAULT_COERCER: LazyLock<Arc<Coercer>> = LazyLock::new(|| Arc::new(Coercer::default()));

/// Stateless conversion engine parameterized by [`CoerceOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coercer {
    options: CoerceOptions,
}

/// Coerce with default options.
pub fn coerce(target: LogicalType, value: Value) -> Result<Value> {
    DEFAULT_COERCER.coerce(target, value)
}

impl Coercer {
    pub fn new(options: CoerceOptions) -> Self {
        Self { options }
    }

    /// Shared instance using default options.
    pub fn shared() -> Arc<Coercer> {
        Arc::clone(&DEFAULT_COERCER)
    }

    pub fn options(&self) -> &CoerceOptions {
        &self.options
    }

    /// Convert `value` into `target`.
    pub fn coerce(&self, target: LogicalType, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let width = self.options.machine_width;
        match target {
            LogicalType::Int8 => {
                self.to_signed(value, target, i8::MIN.into(), i8::MAX.into())
                    .map(|v| Value::Int8(v as i8))
            }
            LogicalType::Int16 => {
                self.to_signed(value, target, i16::MIN.into(), i16::MAX.into())
                    .map(|v| Value::Int16(v as i16))
            }
            LogicalType::Int32 => {
                self.to_signed(value, target, i32::MIN.into(), i32::MAX.into())
                    .map(|v| Value::Int32(v as i32))
            }
            LogicalType::Int64 => self
                .to_signed(value, target, i64::MIN, i64::MAX)
                .map(Value::Int64),
            LogicalType::Int => self
                .to_signed(value, target, width.int_min(), width.int_max())
                .map(Value::Int),
            LogicalType::Uint8 => self
                .to_unsigned(value, target, u8::MAX.into())
                .map(|v| Value::Uint8(v as u8)),
            LogicalType::Uint16 => self
                .to_unsigned(value, target, u16::MAX.into())
                .map(|v| Value::Uint16(v as u16)),
            LogicalType::Uint32 => self
                .to_unsigned(value, target, u32::MAX.into())
                .map(|v| Value::Uint32(v as u32)),
            LogicalType::Uint64 => self
                .to_unsigned(value, target, u64::MAX)
                .map(Value::Uint64),
            LogicalType::Uint => self
                .to_unsigned(value, target, width.uint_max())
                .map(Value::Uint),
            LogicalType::Float32 => numeric::to_float32(value).map(Value::Float32),
            LogicalType::Float64 => numeric::to_float64(value).map(Value::Float64),
            LogicalType::Bool => numeric::to_bool(value).map(Value::Bool),
            LogicalType::String => self.to_string(value).map(Value::String),
            LogicalType::Number => text::to_number(value).map(Value::Number),
            LogicalType::Binary => self.to_binary(value).map(Value::Binary),
            LogicalType::Time => self.to_time(value, target).map(Value::Time),
            LogicalType::Date => self.to_date(value).map(Value::Date),
            LogicalType::Timestamp => self
                .to_time(value, target)
                .map(|time| Value::Int64(time.timestamp())),
        }
    }

    /// Fixed-width little-endian layout of the value's own type.
    fn to_binary(&self, value: Value) -> Result<Vec<u8>> {
        let width = self.options.machine_width;
        let machine = |err: CodecError, from| match err {
            CodecError::MachineOverflow { value, .. } => {
                CoercionError::overflow(from, LogicalType::Binary, value)
            }
            other => CoercionError::parse_failure(other.to_string(), LogicalType::Binary),
        };
        let from = value.kind();
        match value {
            Value::Bool(v) => Ok(encode(v)),
            Value::Int8(v) => Ok(encode(v)),
            Value::Int16(v) => Ok(encode(v)),
            Value::Int32(v) => Ok(encode(v)),
            Value::Int64(v) => Ok(encode(v)),
            Value::Int(v) => width.encode_int(v).map_err(|err| machine(err, from)),
            Value::Uint8(v) => Ok(encode(v)),
            Value::Uint16(v) => Ok(encode(v)),
            Value::Uint32(v) => Ok(encode(v)),
            Value::Uint64(v) => Ok(encode(v)),
            Value::Uint(v) => width.encode_uint(v).map_err(|err| machine(err, from)),
            Value::Float32(v) => Ok(encode(v)),
            Value::Float64(v) => Ok(encode(v)),
            Value::String(text) | Value::Number(text) => Ok(text.into_bytes()),
            Value::Binary(bytes) => Ok(bytes),
            Value::Time(_) | Value::Date(_) => {
                let time = self.to_time(value, LogicalType::Binary)?;
                Ok(encode(time.timestamp()))
            }
            Value::Null | Value::List(_) | Value::Record(_) => {
                Err(CoercionError::unsupported(from, LogicalType::Binary))
            }
        }
    }
}

/// Decode an exact-width binary value for an integer or float target.
pub(crate) fn decode_exact<T: FixedWidth>(bytes: &[u8], to: LogicalType) -> Result<T> {
    T::from_le(bytes).map_err(|err| codec_error(err, to))
}

pub(crate) fn codec_error(err: CodecError, to: LogicalType) -> CoercionError {
    match err {
        CodecError::WidthMismatch {
            expected, actual, ..
        } => CoercionError::InvalidBinaryWidth {
            to,
            expected,
            actual,
        },
        CodecError::InvalidBool { byte } => {
            CoercionError::parse_failure(format!("0x{byte:02x}"), to)
        }
        CodecError::MachineOverflow { value, .. } => CoercionError::overflow("binary", to, value),
    }
}
