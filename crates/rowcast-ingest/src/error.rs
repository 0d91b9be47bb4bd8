//! Error types for definition loading and stream processing.

use thiserror::Error;

use rowcast_core::RecordError;

/// Errors that can occur while building templates or processing a stream.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The definition document is not a valid list of columns.
    #[error("invalid definitions: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A column or field spec names a type that does not exist.
    #[error("unknown type {type_name:?} for field {column:?}")]
    UnknownType { column: String, type_name: String },

    /// A positional `name:type` argument is malformed.
    #[error("invalid field spec {spec:?}: {message}")]
    InvalidFieldSpec { spec: String, message: &'static str },

    /// An input line is not valid JSON.
    #[error("line {line}: malformed JSON: {message}")]
    Json { line: usize, message: String },

    /// An input line is JSON but neither an array nor an object.
    #[error("line {line}: expected a JSON array or object, found {found}")]
    NotARow { line: usize, found: &'static str },

    /// An input line could not be turned into a record.
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Create an UnknownType error.
    pub fn unknown_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an InvalidFieldSpec error.
    pub fn invalid_field_spec(spec: impl Into<String>, message: &'static str) -> Self {
        Self::InvalidFieldSpec {
            spec: spec.into(),
            message,
        }
    }

    /// Attribute a record error to an input line.
    pub fn at_line(line: usize, source: RecordError) -> Self {
        match source {
            RecordError::MalformedJson { message, .. } => Self::Json { line, message },
            RecordError::NotARecord { found } => Self::NotARow { line, found },
            source => Self::Record { line, source },
        }
    }

    /// The 1-based input line this error belongs to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Json { line, .. } | Self::NotARow { line, .. } | Self::Record { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Like `to_string`, without leaking record values.
    pub fn redacted(&self) -> String {
        match self {
            Self::Record { line, source } => format!("line {line}: {}", source.redacted()),
            other => other.to_string(),
        }
    }
}
