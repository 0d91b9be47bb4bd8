//! Record templates: ordered field declarations that stamp out records.

use std::sync::Arc;

use tracing::debug;

use crate::coerce::Coercer;
use crate::error::{RecordError, Result};
use crate::format::Format;
use crate::record::Record;
use crate::structured::StructuredValue;
use crate::types::LogicalType;
use crate::value::{Value, json_kind};

/// Raw input for [`Template::create_row`].
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Values bound to declared fields by position.
    Sequence(Vec<Value>),
    /// Values bound by name; unknown names are appended as auto fields.
    Map(Vec<(String, Value)>),
}

impl Input {
    /// Decode one JSON document: an array binds by position, an object by name.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::try_from(value)
    }

    pub fn len(&self) -> usize {
        match self {
            Input::Sequence(values) => values.len(),
            Input::Map(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Input {
    fn from(values: Vec<Value>) -> Self {
        Input::Sequence(values)
    }
}

impl From<Vec<(String, Value)>> for Input {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Input::Map(pairs)
    }
}

impl From<Record> for Input {
    fn from(record: Record) -> Self {
        Input::Map(record.into_values())
    }
}

impl TryFrom<serde_json::Value> for Input {
    type Error = RecordError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => {
                Ok(Input::Sequence(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Ok(Input::Map(
                map.into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            )),
            other => Err(RecordError::NotARecord {
                found: json_kind(&other),
            }),
        }
    }
}

/// An ordered list of field declarations.
///
/// Declaring a name twice replaces its format but keeps its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    fields: Vec<(String, Format)>,
    coercer: Arc<Coercer>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_fields {
    ($($method:ident => $ty:ident),* $(,)?) => {
        $(
            #[doc = concat!("Declare a field exported as `", stringify!($ty), "`.")]
            #[must_use]
            pub fn $method(self, name: impl Into<String>) -> Self {
                self.with_field(name, Format::Type(LogicalType::$ty))
            }
        )*
    };
}

impl Template {
    /// Create an empty template using the default coercion options.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            coercer: Coercer::shared(),
        }
    }

    /// Declare a field with an explicit format.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, format: impl Into<Format>) -> Self {
        let name = name.into();
        let mut format = format.into();
        if let Format::Nested(template) = &mut format {
            template.set_coercer(&self.coercer);
        }
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = format,
            None => self.fields.push((name, format)),
        }
        self
    }

    typed_fields! {
        with_int8 => Int8,
        with_int16 => Int16,
        with_int32 => Int32,
        with_int64 => Int64,
        with_int => Int,
        with_uint8 => Uint8,
        with_uint16 => Uint16,
        with_uint32 => Uint32,
        with_uint64 => Uint64,
        with_uint => Uint,
        with_float32 => Float32,
        with_float64 => Float64,
        with_bool => Bool,
        with_string => String,
        with_number => Number,
        with_binary => Binary,
        with_time => Time,
        with_date => Date,
        with_timestamp => Timestamp,
    }

    /// Declare a field that keeps the input's own shape.
    #[must_use]
    pub fn with_auto(self, name: impl Into<String>) -> Self {
        self.with_field(name, Format::Auto)
    }

    /// Declare a field that is never exported.
    #[must_use]
    pub fn with_hidden(self, name: impl Into<String>) -> Self {
        self.with_field(name, Format::Hidden)
    }

    /// Declare a nested record field built by `template`.
    #[must_use]
    pub fn with_nested(self, name: impl Into<String>, template: Template) -> Self {
        self.with_field(name, Format::Nested(template))
    }

    /// Use `coercer` for this template and every nested template.
    #[must_use]
    pub fn with_coercer(mut self, coercer: Arc<Coercer>) -> Self {
        self.set_coercer(&coercer);
        self
    }

    fn set_coercer(&mut self, coercer: &Arc<Coercer>) {
        self.coercer = Arc::clone(coercer);
        for (_, format) in &mut self.fields {
            if let Format::Nested(template) = format {
                template.set_coercer(coercer);
            }
        }
    }

    /// The coercer handed to every record this template creates.
    pub fn coercer(&self) -> &Arc<Coercer> {
        &self.coercer
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Declared fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Format)> {
        self.fields.iter().map(|(name, format)| (name.as_str(), format))
    }

    pub fn format_of(&self, name: &str) -> Option<&Format> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, format)| format)
    }

    /// A record with every declared field present and null.
    pub fn create_empty(&self) -> Record {
        let mut record = Record::with_coercer(Arc::clone(&self.coercer));
        for (name, format) in &self.fields {
            record.set(name.clone(), StructuredValue::new(Value::Null, format.clone()));
        }
        record
    }

    /// Stamp out a record from positional or keyed input.
    ///
    /// Positional values bind to declared fields in order; a shorter sequence
    /// leaves the remaining fields null and a longer one fails. Keyed values
    /// bind by name and unknown names are appended after the declared fields
    /// in first-seen order. Any failing field fails the whole call.
    pub fn create_row(&self, input: impl Into<Input>) -> Result<Record> {
        let mut record = self.create_empty();
        match input.into() {
            Input::Sequence(values) => {
                if values.len() > self.fields.len() {
                    return Err(RecordError::TooManyValues {
                        expected: self.fields.len(),
                        actual: values.len(),
                    });
                }
                for (index, value) in values.into_iter().enumerate() {
                    record.import_at_index(index, value)?;
                }
            }
            Input::Map(pairs) => {
                for (name, value) in pairs {
                    if !record.contains(&name) {
                        debug!(field = %name, "appending undeclared field");
                    }
                    record.import_at_key(&name, value)?;
                }
            }
        }
        Ok(record)
    }

    /// Decode a JSON object into a fresh record of this template.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<Record> {
        let mut record = self.create_empty();
        record.unmarshal_json(bytes)?;
        Ok(record)
    }
}
