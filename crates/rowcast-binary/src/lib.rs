//! Fixed-width binary encoding for rowcast values.
//!
//! Every numeric width has exactly one byte layout: little-endian two's
//! complement for integers, little-endian IEEE-754 bit patterns for floats,
//! and a single `0x00`/`0x01` byte for booleans. Decoding is strict: the input
//! length must equal the type's width, there is no padding or truncation.
//!
//! # Example
//!
//! ```
//! use rowcast_binary::{FixedWidth, decode, encode};
//!
//! let bytes = encode(1i64);
//! assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(decode::<i64>(&bytes).unwrap(), 1);
//! assert_eq!(i16::WIDTH, 2);
//!
//! // Wrong length is an error, never a best-effort decode.
//! assert!(decode::<i32>(&bytes).is_err());
//! ```
//!
//! # Machine-width integers
//!
//! The platform `int`/`uint` width is not a portable wire format, so it is a
//! parameter ([`MachineWidth`]) instead of being inferred from the host.

mod codec;
mod error;
mod width;

pub use codec::{FixedWidth, decode, encode};
pub use error::{CodecError, Result};
pub use width::MachineWidth;
