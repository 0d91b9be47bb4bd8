//! Input side of rowcast: turning definition files and JSON Lines into records.
//!
//! - **definition**: YAML column definitions and `name:type` field specs, resolved to a [`Template`]
//! - **stream**: newline-delimited JSON readers and writers
//! - **processor**: the per-line conversion loop with a pluggable [`ErrorHandler`]
//!
//! [`Template`]: rowcast_core::Template

pub mod definition;
pub mod error;
pub mod processor;
pub mod stream;

pub use definition::{
    ColumnDefinition, DefinitionOptions, UnknownTypePolicy, load_definitions, parse_definitions,
    parse_field_spec, resolve_type, template_from_definitions, template_from_field_specs,
};
pub use error::{IngestError, Result};
pub use processor::{
    AbortOnError, ErrorAction, ErrorHandler, ProcessSummary, Processor, ProcessorOptions,
    SkipInvalid,
};
pub use stream::{JsonLinesReader, JsonLinesWriter};
