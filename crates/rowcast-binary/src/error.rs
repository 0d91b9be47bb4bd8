//! Error types for binary encoding and decoding.

use thiserror::Error;

/// Errors raised by the fixed-width codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input length does not match the width of the requested type.
    #[error("{type_name} requires exactly {expected} bytes, got {actual}")]
    WidthMismatch {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A boolean byte other than `0x00` or `0x01`.
    #[error("invalid boolean byte 0x{byte:02x}")]
    InvalidBool { byte: u8 },

    /// Value does not fit in the configured machine-width integer.
    #[error("value {value} does not fit in a {bits}-bit machine integer")]
    MachineOverflow { value: String, bits: u32 },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create a WidthMismatch error.
    pub fn width_mismatch(type_name: &'static str, expected: usize, actual: usize) -> Self {
        Self::WidthMismatch {
            type_name,
            expected,
            actual,
        }
    }

    /// Create a MachineOverflow error.
    pub fn machine_overflow(value: impl ToString, bits: u32) -> Self {
        Self::MachineOverflow {
            value: value.to_string(),
            bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::width_mismatch("int32", 4, 8);
        assert_eq!(format!("{err}"), "int32 requires exactly 4 bytes, got 8");

        let err = CodecError::InvalidBool { byte: 0x7f };
        assert_eq!(format!("{err}"), "invalid boolean byte 0x7f");

        let err = CodecError::machine_overflow(u64::MAX, 32);
        assert!(format!("{err}").contains("32-bit"));
    }
}
