//! Insertion-ordered records.
//!
//! A [`Record`] maps field names to [`StructuredValue`]s and remembers the
//! order in which names first appeared. Replacing a value keeps its position;
//! JSON output always follows that order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::coerce::Coercer;
use crate::error::{RecordError, Result};
use crate::structured::StructuredValue;
use crate::value::{Value, json_kind};

/// Deepest level of record nesting accepted by export and serialization.
pub const MAX_NESTING_DEPTH: usize = 128;

/// An ordered, mutable collection of named fields.
#[derive(Clone)]
pub struct Record {
    entries: Vec<(String, StructuredValue)>,
    index: HashMap<String, usize>,
    coercer: Arc<Coercer>,
}

impl Record {
    /// Create an empty record using the default coercion options.
    pub fn new() -> Self {
        Self::with_coercer(Coercer::shared())
    }

    /// Create an empty record that coerces through `coercer`.
    pub fn with_coercer(coercer: Arc<Coercer>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            coercer,
        }
    }

    /// The coercer used by imports and exports.
    pub fn coercer(&self) -> &Arc<Coercer> {
        &self.coercer
    }

    /// Number of fields, hidden ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when a field named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructuredValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Insert or replace a field. A replaced field keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: StructuredValue) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    /// Replace the field currently at `index`.
    pub fn set_at_index(&mut self, index: usize, value: StructuredValue) -> Result<()> {
        let len = self.entries.len();
        let (_, slot) = self
            .entries
            .get_mut(index)
            .ok_or(RecordError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StructuredValue> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StructuredValue> {
        self.index
            .get(name)
            .map(|&position| &mut self.entries[position].1)
    }

    /// The field at `index` in insertion order.
    pub fn get_at_index(&self, index: usize) -> Option<(&str, &StructuredValue)> {
        self.entries
            .get(index)
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Import a raw value by name.
    ///
    /// An existing field keeps its format and the value is coerced through it;
    /// a new field is appended with the auto format.
    pub fn import_at_key(&mut self, name: &str, raw: impl Into<Value>) -> Result<()> {
        let raw = raw.into();
        match self.index.get(name) {
            Some(&position) => self.import_at(position, raw),
            None => {
                self.set(name, StructuredValue::auto(raw));
                Ok(())
            }
        }
    }

    /// Import a raw value into the field at `index`.
    pub fn import_at_index(&mut self, index: usize, raw: impl Into<Value>) -> Result<()> {
        if index >= self.entries.len() {
            return Err(RecordError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.import_at(index, raw.into())
    }

    fn import_at(&mut self, position: usize, raw: Value) -> Result<()> {
        let len = self.entries.len();
        let (name, entry) = self
            .entries
            .get_mut(position)
            .ok_or(RecordError::IndexOutOfRange {
                index: position,
                len,
            })?;
        let value = entry
            .format()
            .import(raw, &self.coercer)
            .map_err(|err| err.in_field(name.clone()))?;
        entry.set_raw(value);
        Ok(())
    }

    /// Remove a field; the remaining fields keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<StructuredValue> {
        let position = self.index.remove(name)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Raw values in insertion order, formats dropped.
    pub fn into_values(self) -> Vec<(String, Value)> {
        self.entries
            .into_iter()
            .map(|(name, value)| (name, value.into_raw()))
            .collect()
    }

    /// Export every visible field into a new all-auto record.
    ///
    /// Hidden fields are skipped. The first failing field aborts the export
    /// and is named in the error.
    pub fn export(&self) -> Result<Record> {
        self.export_at(0)
    }

    pub(crate) fn export_at(&self, depth: usize) -> Result<Record> {
        if depth > MAX_NESTING_DEPTH {
            return Err(RecordError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        let mut exported = Record::with_coercer(Arc::clone(&self.coercer));
        for (name, value) in &self.entries {
            if value.is_hidden() {
                continue;
            }
            let raw = value
                .export_at(&self.coercer, depth)
                .map_err(|err| err.in_field(name.clone()))?;
            exported.set(name.clone(), StructuredValue::auto(raw));
        }
        Ok(exported)
    }

    /// Encode as a JSON object in insertion order.
    pub fn to_json(&self) -> Result<String> {
        let exported = self.export()?;
        serde_json::to_string(&Exported(&exported)).map_err(|err| RecordError::Serialize(err.to_string()))
    }

    /// Like [`Record::to_json`], as bytes.
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        let exported = self.export()?;
        serde_json::to_vec(&Exported(&exported)).map_err(|err| RecordError::Serialize(err.to_string()))
    }

    /// Parse a JSON object into an auto-typed record, keeping key order.
    pub fn from_json(bytes: &[u8]) -> Result<Record> {
        match serde_json::from_slice::<serde_json::Value>(bytes)? {
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (name, value) in map {
                    record.set(name, StructuredValue::auto(Value::from(value)));
                }
                Ok(record)
            }
            other => Err(RecordError::NotARecord {
                found: json_kind(&other),
            }),
        }
    }

    /// Import every key of a JSON object through [`Record::import_at_key`].
    ///
    /// All-or-nothing: on error the record is left unchanged.
    pub fn unmarshal_json(&mut self, bytes: &[u8]) -> Result<()> {
        let map = match serde_json::from_slice::<serde_json::Value>(bytes)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RecordError::NotARecord {
                    found: json_kind(&other),
                });
            }
        };
        let mut staged = self.clone();
        for (name, value) in map {
            staged.import_at_key(&name, Value::from(value))?;
        }
        *self = staged;
        Ok(())
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, value)| (name, value)))
            .finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let exported = self.export().map_err(S::Error::custom)?;
        Exported(&exported).serialize(serializer)
    }
}

/// A record already passed through [`Record::export`], serialized as is.
///
/// Nested records in an exported tree are exported too, so they are written
/// directly instead of being exported again at every level.
struct Exported<'a>(&'a Record);

impl Serialize for Exported<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0.entries {
            map.serialize_entry(name, &ExportedValue(value.raw()))?;
        }
        map.end()
    }
}

struct ExportedValue<'a>(&'a Value);

impl Serialize for ExportedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Record(record) => Exported(record).serialize(serializer),
            Value::List(items) => serializer.collect_seq(items.iter().map(ExportedValue)),
            other => other.serialize(serializer),
        }
    }
}
