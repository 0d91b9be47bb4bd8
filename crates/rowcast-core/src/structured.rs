//! A raw value paired with its export format.

use serde::ser::{Error as _, Serialize, Serializer};

use crate::coerce::Coercer;
use crate::error::{RecordError, Result};
use crate::format::Format;
use crate::types::LogicalType;
use crate::value::Value;

/// The unit stored in a [`crate::Record`] entry.
///
/// Exporting has no side effects, so calling [`StructuredValue::export`]
/// twice without an intervening mutation yields equal results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredValue {
    raw: Value,
    format: Format,
}

impl StructuredValue {
    pub fn new(raw: impl Into<Value>, format: impl Into<Format>) -> Self {
        Self {
            raw: raw.into(),
            format: format.into(),
        }
    }

    /// A value exported as-is.
    pub fn auto(raw: impl Into<Value>) -> Self {
        Self::new(raw, Format::Auto)
    }

    /// A value that is never exported.
    pub fn hidden(raw: impl Into<Value>) -> Self {
        Self::new(raw, Format::Hidden)
    }

    /// A value exported as `ty`.
    pub fn typed(raw: impl Into<Value>, ty: LogicalType) -> Self {
        Self::new(raw, Format::Type(ty))
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    pub fn set_raw(&mut self, raw: impl Into<Value>) {
        self.raw = raw.into();
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Replace the export format. Not validated; a format the raw value
    /// cannot convert to only fails at export time.
    pub fn set_format(&mut self, format: impl Into<Format>) {
        self.format = format.into();
    }

    pub fn is_hidden(&self) -> bool {
        self.format.is_hidden()
    }

    /// Coerce the raw value into its export format using default options.
    ///
    /// Hidden values fail with [`crate::CoercionError::Hidden`].
    pub fn export(&self) -> Result<Value> {
        self.export_with(&Coercer::shared())
    }

    pub fn export_with(&self, coercer: &Coercer) -> Result<Value> {
        self.export_at(coercer, 0)
    }

    pub(crate) fn export_at(&self, coercer: &Coercer, depth: usize) -> Result<Value> {
        self.format.export(&self.raw, coercer, depth)
    }

    /// Export, then encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        let exported = self.export()?;
        serde_json::to_string(&exported).map_err(|err| RecordError::Serialize(err.to_string()))
    }
}

impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.export()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoercionError;

    #[test]
    fn test_export_is_idempotent() {
        let value = StructuredValue::typed("0x10", LogicalType::Uint8);
        assert_eq!(value.export().unwrap(), Value::Uint8(16));
        assert_eq!(value.export().unwrap(), value.export().unwrap());
        assert_eq!(value.raw(), &Value::from("0x10"));
    }

    #[test]
    fn test_set_format_defers_errors() {
        let mut value = StructuredValue::auto("hello");
        value.set_format(LogicalType::Int32);
        assert_eq!(
            value.export().unwrap_err().coercion(),
            Some(&CoercionError::parse_failure("hello", LogicalType::Int32))
        );
    }

    #[test]
    fn test_to_json() {
        assert_eq!(
            StructuredValue::typed(1i64, LogicalType::Binary).to_json().unwrap(),
            r#""AQAAAAAAAAA=""#
        );
        assert_eq!(StructuredValue::auto(Value::Null).to_json().unwrap(), "null");
        assert!(StructuredValue::hidden("secret").to_json().is_err());
    }
}
