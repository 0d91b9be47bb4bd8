//! Schema-driven coercion and ordered records.
//!
//! This crate provides the conversion core of rowcast:
//!
//! - **types**: the closed set of [`LogicalType`]s a value can be coerced into
//! - **value**: the dynamically-typed [`Value`] used as coercion input and output
//! - **coerce**: the [`Coercer`], a pure all-pairs conversion engine
//! - **structured**: a [`StructuredValue`] pairing a raw value with its export [`Format`]
//! - **record**: an insertion-ordered [`Record`] that serializes to JSON deterministically
//! - **template**: a [`Template`] stamping out records from positional or keyed input
//!
//! # Example
//!
//! ```
//! use rowcast_core::{Template, Value};
//!
//! let template = Template::new()
//!     .with_string("title")
//!     .with_number("release_date");
//! let record = template
//!     .create_row(vec![
//!         ("title".to_string(), Value::from("The Matrix")),
//!         ("release_date".to_string(), Value::from("1999")),
//!     ])
//!     .unwrap();
//! assert_eq!(
//!     record.to_json().unwrap(),
//!     r#"{"title":"The Matrix","release_date":1999}"#
//! );
//! ```

pub mod coerce;
pub mod error;
pub mod format;
pub mod record;
pub mod structured;
pub mod template;
pub mod types;
pub mod value;

pub use coerce::{CoerceOptions, Coercer, coerce};
pub use error::{CoercionError, REDACTED, RecordError, Result};
pub use format::Format;
pub use record::{MAX_NESTING_DEPTH, Record};
pub use rowcast_binary::MachineWidth;
pub use structured::StructuredValue;
pub use template::{Input, Template};
pub use types::LogicalType;
pub use value::Value;
