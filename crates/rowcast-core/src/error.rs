//! Error types for coercion and record handling.

use thiserror::Error;

use crate::types::LogicalType;

/// Placeholder logged in place of record values.
pub const REDACTED: &str = "[REDACTED]";

/// Errors returned by the coercion engine.
///
/// None of these are retried internally; every failure goes back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// No conversion path exists between the source and the target.
    #[error("cannot convert {from} to {to}")]
    Unsupported { from: &'static str, to: LogicalType },

    /// The source value lies outside the target's representable range.
    #[error("{value} ({from}) is out of range for {to}")]
    Overflow {
        from: &'static str,
        to: LogicalType,
        value: String,
    },

    /// Text did not match the target's literal grammar.
    #[error("cannot parse {text:?} as {to}")]
    ParseFailure { text: String, to: LogicalType },

    /// Binary input length does not match the target width.
    #[error("{to} from binary requires {expected} bytes, got {actual}")]
    InvalidBinaryWidth {
        to: LogicalType,
        expected: usize,
        actual: usize,
    },

    /// A hidden value was asked to export.
    #[error("hidden values are never exported")]
    Hidden,
}

impl CoercionError {
    /// Create an Unsupported error.
    pub fn unsupported(from: &'static str, to: LogicalType) -> Self {
        Self::Unsupported { from, to }
    }

    /// Create an Overflow error.
    pub fn overflow(from: &'static str, to: LogicalType, value: impl ToString) -> Self {
        Self::Overflow {
            from,
            to,
            value: value.to_string(),
        }
    }

    /// Create a ParseFailure error.
    pub fn parse_failure(text: impl Into<String>, to: LogicalType) -> Self {
        Self::ParseFailure {
            text: text.into(),
            to,
        }
    }

    /// The error message with any input value replaced by [`REDACTED`].
    pub fn redacted(&self) -> String {
        match self {
            Self::Overflow { from, to, .. } => {
                format!("{REDACTED} ({from}) is out of range for {to}")
            }
            Self::ParseFailure { to, .. } => format!("cannot parse {REDACTED} as {to}"),
            other => other.to_string(),
        }
    }
}

/// Errors returned by records and templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A value failed to coerce.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// An error attributed to a named field.
    #[error("field {name:?}: {source}")]
    Field {
        name: String,
        #[source]
        source: Box<RecordError>,
    },

    /// Input bytes were not valid JSON.
    #[error("malformed JSON: {message}")]
    MalformedJson {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input was valid JSON but not an object (or an array, where positional input is allowed).
    #[error("expected a record, found {found}")]
    NotARecord { found: &'static str },

    /// Positional access past the last field.
    #[error("index {index} is out of range for a record with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// More positional values than declared fields.
    #[error("{actual} positional values for {expected} declared fields")]
    TooManyValues { expected: usize, actual: usize },

    /// Records nested deeper than [`crate::MAX_NESTING_DEPTH`].
    #[error("record nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Serializer failure while writing JSON.
    #[error("failed to serialize record: {0}")]
    Serialize(String),
}

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

impl RecordError {
    /// Attribute this error to a field.
    #[must_use]
    pub fn in_field(self, name: impl Into<String>) -> Self {
        Self::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The innermost coercion error, looking through field wrappers.
    pub fn coercion(&self) -> Option<&CoercionError> {
        match self {
            Self::Coercion(err) => Some(err),
            Self::Field { source, .. } => source.coercion(),
            _ => None,
        }
    }

    /// Field path from the outermost record to the failing value.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Field { name, source } = current {
            path.push(name.as_str());
            current = source;
        }
        path
    }

    /// Like `to_string`, without leaking input values.
    pub fn redacted(&self) -> String {
        match self {
            Self::Coercion(err) => err.redacted(),
            Self::Field { name, source } => format!("field {name:?}: {}", source.redacted()),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
