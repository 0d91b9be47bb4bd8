//! Per-field export formats.

use std::fmt;

use crate::coerce::Coercer;
use crate::error::{CoercionError, RecordError, Result};
use crate::record::MAX_NESTING_DEPTH;
use crate::template::{Input, Template};
use crate::types::LogicalType;
use crate::value::Value;

/// How a field's raw value is imported and exported.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Format {
    /// Keep whatever shape the input had.
    #[default]
    Auto,
    /// Never exported.
    Hidden,
    /// Coerced to a logical type on import and export.
    Type(LogicalType),
    /// A nested record stamped out by a sub-template.
    Nested(Template),
}

impl Format {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Format::Hidden)
    }

    /// The declared logical type, if any.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Format::Type(ty) => Some(*ty),
            _ => None,
        }
    }

    /// Wrap an incoming raw value for storage under this format.
    pub(crate) fn import(&self, raw: Value, coercer: &Coercer) -> Result<Value> {
        match self {
            Format::Auto | Format::Hidden => Ok(raw),
            Format::Type(ty) => Ok(coercer.coerce(*ty, raw)?),
            Format::Nested(template) => match raw {
                Value::Null => Ok(Value::Null),
                Value::Record(record) => template
                    .create_row(Input::Map(record.into_values()))
                    .map(Value::Record),
                Value::List(items) => template
                    .create_row(Input::Sequence(items))
                    .map(Value::Record),
                other => Err(RecordError::NotARecord {
                    found: other.kind(),
                }),
            },
        }
    }

    /// Produce the exported form of `raw`. `depth` counts enclosing records.
    pub(crate) fn export(&self, raw: &Value, coercer: &Coercer, depth: usize) -> Result<Value> {
        match self {
            Format::Hidden => Err(CoercionError::Hidden.into()),
            Format::Type(ty) => Ok(coercer.coerce(*ty, raw.clone())?),
            Format::Auto | Format::Nested(_) => export_auto(raw, depth),
        }
    }
}

fn export_auto(raw: &Value, depth: usize) -> Result<Value> {
    match raw {
        Value::Record(record) => record.export_at(depth + 1).map(Value::Record),
        Value::List(items) => {
            if depth >= MAX_NESTING_DEPTH {
                return Err(RecordError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                });
            }
            items
                .iter()
                .map(|item| export_auto(item, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(Value::List)
        }
        other => Ok(other.clone()),
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Auto => f.write_str("auto"),
            Format::Hidden => f.write_str("hidden"),
            Format::Type(ty) => write!(f, "{ty}"),
            Format::Nested(_) => f.write_str("record"),
        }
    }
}

impl From<LogicalType> for Format {
    fn from(ty: LogicalType) -> Self {
        Format::Type(ty)
    }
}

impl From<Template> for Format {
    fn from(template: Template) -> Self {
        Format::Nested(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Format::Auto.to_string(), "auto");
        assert_eq!(Format::Hidden.to_string(), "hidden");
        assert_eq!(Format::from(LogicalType::Uint16).to_string(), "uint16");
        assert_eq!(Format::from(Template::new()).to_string(), "record");
    }

    #[test]
    fn test_hidden_never_exports() {
        let coercer = Coercer::default();
        let err = Format::Hidden
            .export(&Value::from("secret"), &coercer, 0)
            .unwrap_err();
        assert_eq!(err.coercion(), Some(&CoercionError::Hidden));
    }

    #[test]
    fn test_typed_import_coerces() {
        let coercer = Coercer::default();
        let format = Format::Type(LogicalType::Int16);
        assert_eq!(format.import(Value::from("12"), &coercer).unwrap(), Value::Int16(12));
        assert!(format.import(Value::from("x"), &coercer).is_err());
    }

    #[test]
    fn test_nested_import_rejects_scalars() {
        let format = Format::Nested(Template::new().with_string("a"));
        let err = format
            .import(Value::Int32(1), &Coercer::default())
            .unwrap_err();
        assert_eq!(err, RecordError::NotARecord { found: "int32" });
    }
}
