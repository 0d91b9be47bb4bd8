//! Column definitions and field specs.
//!
//! A definition document is a YAML (or JSON) list of `{name, type, columns}`
//! entries. An entry with `columns` declares a nested record whose fields are
//! built recursively; its `type` is ignored.
//!
//! ```yaml
//! - name: title
//!   type: string
//! - name: release_date
//!   type: numeric
//! - name: studio
//!   columns:
//!     - name: name
//!       type: string
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use rowcast_core::{Format, LogicalType, Template};

use crate::error::{IngestError, Result};

/// One entry of a definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDefinition>,
}

/// What to do with a column whose type is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTypePolicy {
    /// Drop the column with a warning.
    #[default]
    Ignore,
    /// Fail the whole definition.
    Reject,
}

/// Options for building a template from definitions.
#[derive(Debug, Clone, Default)]
pub struct DefinitionOptions {
    pub unknown_types: UnknownTypePolicy,
}

impl DefinitionOptions {
    /// Set the unknown type policy.
    #[must_use]
    pub fn with_unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_types = policy;
        self
    }
}

/// Resolve a definition or field-spec type name.
///
/// Accepts the definition names (`numeric`, `boolean`, `datetime`, ...) and
/// every canonical logical type name, case-insensitively.
pub fn resolve_type(type_name: &str) -> Option<Format> {
    let normalized = type_name.trim().to_ascii_lowercase();
    let format = match normalized.as_str() {
        "auto" => Format::Auto,
        "hidden" => Format::Hidden,
        "numeric" => Format::Type(LogicalType::Number),
        "boolean" => Format::Type(LogicalType::Bool),
        "datetime" => Format::Type(LogicalType::Time),
        other => Format::Type(other.parse::<LogicalType>().ok()?),
    };
    Some(format)
}

/// Parse a definition document.
pub fn parse_definitions(text: &str) -> Result<Vec<ColumnDefinition>> {
    Ok(serde_yaml::from_str(text)?)
}

/// Load a definition document from a file.
pub fn load_definitions(path: &Path) -> Result<Vec<ColumnDefinition>> {
    let file = File::open(path)?;
    let definitions: Vec<ColumnDefinition> = serde_yaml::from_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        columns = definitions.len(),
        "Loaded column definitions"
    );
    Ok(definitions)
}

/// Build a template from column definitions, in document order.
pub fn template_from_definitions(
    definitions: &[ColumnDefinition],
    options: &DefinitionOptions,
) -> Result<Template> {
    let mut template = Template::new();
    for definition in definitions {
        if !definition.columns.is_empty() {
            let nested = template_from_definitions(&definition.columns, options)?;
            template = template.with_nested(definition.name.clone(), nested);
            continue;
        }
        let type_name = definition.type_name.as_deref().unwrap_or_default();
        match resolve_type(type_name) {
            Some(format) => template = template.with_field(definition.name.clone(), format),
            None => match options.unknown_types {
                UnknownTypePolicy::Ignore => warn!(
                    column = %definition.name,
                    type_name,
                    "Ignoring column with unknown type"
                ),
                UnknownTypePolicy::Reject => {
                    return Err(IngestError::unknown_type(&definition.name, type_name));
                }
            },
        }
    }
    Ok(template)
}

/// Parse a `name:type` field spec; a bare `name` is auto-typed.
pub fn parse_field_spec(spec: &str) -> Result<(String, Format)> {
    let (name, type_name) = match spec.split_once(':') {
        Some((name, type_name)) => (name.trim(), Some(type_name.trim())),
        None => (spec.trim(), None),
    };
    if name.is_empty() {
        return Err(IngestError::invalid_field_spec(spec, "field name is empty"));
    }
    let format = match type_name {
        None => Format::Auto,
        Some("") => return Err(IngestError::invalid_field_spec(spec, "type is empty")),
        Some(type_name) => {
            resolve_type(type_name).ok_or_else(|| IngestError::unknown_type(name, type_name))?
        }
    };
    Ok((name.to_string(), format))
}

/// Build a template from positional field specs.
pub fn template_from_field_specs<S: AsRef<str>>(specs: &[S]) -> Result<Template> {
    specs.iter().try_fold(Template::new(), |template, spec| {
        let (name, format) = parse_field_spec(spec.as_ref())?;
        Ok(template.with_field(name, format))
    })
}
