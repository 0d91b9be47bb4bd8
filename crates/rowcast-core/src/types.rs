//! Logical types: the fixed set of coercion targets.

use std::fmt;
use std::str::FromStr;

/// A target type a value can be coerced into.
///
/// `Int` and `Uint` follow the configured [`crate::MachineWidth`].
/// `Timestamp` coerces to seconds since the Unix epoch held as an `Int64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Int8,
    Int16,
    Int32,
    Int64,
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint,
    Float32,
    Float64,
    Bool,
    String,
    /// Arbitrary-precision decimal text.
    Number,
    Binary,
    /// An instant with a UTC offset.
    Time,
    Date,
    Timestamp,
}

impl LogicalType {
    /// Every logical type, in declaration order.
    pub const ALL: [LogicalType; 19] = [
        LogicalType::Int8,
        LogicalType::Int16,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::Int,
        LogicalType::Uint8,
        LogicalType::Uint16,
        LogicalType::Uint32,
        LogicalType::Uint64,
        LogicalType::Uint,
        LogicalType::Float32,
        LogicalType::Float64,
        LogicalType::Bool,
        LogicalType::String,
        LogicalType::Number,
        LogicalType::Binary,
        LogicalType::Time,
        LogicalType::Date,
        LogicalType::Timestamp,
    ];

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::Int8 => "int8",
            LogicalType::Int16 => "int16",
            LogicalType::Int32 => "int32",
            LogicalType::Int64 => "int64",
            LogicalType::Int => "int",
            LogicalType::Uint8 => "uint8",
            LogicalType::Uint16 => "uint16",
            LogicalType::Uint32 => "uint32",
            LogicalType::Uint64 => "uint64",
            LogicalType::Uint => "uint",
            LogicalType::Float32 => "float32",
            LogicalType::Float64 => "float64",
            LogicalType::Bool => "bool",
            LogicalType::String => "string",
            LogicalType::Number => "number",
            LogicalType::Binary => "binary",
            LogicalType::Time => "time",
            LogicalType::Date => "date",
            LogicalType::Timestamp => "timestamp",
        }
    }

    /// Returns true for the signed integer types.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            LogicalType::Int8
                | LogicalType::Int16
                | LogicalType::Int32
                | LogicalType::Int64
                | LogicalType::Int
        )
    }

    /// Returns true for the unsigned integer types.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            LogicalType::Uint8
                | LogicalType::Uint16
                | LogicalType::Uint32
                | LogicalType::Uint64
                | LogicalType::Uint
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogicalType {
    type Err = String;

    /// Parse a canonical type name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        LogicalType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| format!("Unknown logical type: {s}"))
    }
}
