//! Machine-width integer configuration.

use std::fmt;
use std::str::FromStr;

use crate::codec::{decode, encode};
use crate::error::{CodecError, Result};

/// Width of the platform `int`/`uint` logical types.
///
/// The machine width is a property of the target platform rather than of the
/// data, so callers pick one explicitly. Defaults to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MachineWidth {
    /// 32-bit `int`/`uint`.
    W32,
    /// 64-bit `int`/`uint`.
    #[default]
    W64,
}

impl MachineWidth {
    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// Smallest signed value representable at this width.
    #[must_use]
    pub const fn int_min(self) -> i64 {
        match self {
            Self::W32 => i32::MIN as i64,
            Self::W64 => i64::MIN,
        }
    }

    /// Largest signed value representable at this width.
    #[must_use]
    pub const fn int_max(self) -> i64 {
        match self {
            Self::W32 => i32::MAX as i64,
            Self::W64 => i64::MAX,
        }
    }

    /// Largest unsigned value representable at this width.
    #[must_use]
    pub const fn uint_max(self) -> u64 {
        match self {
            Self::W32 => u32::MAX as u64,
            Self::W64 => u64::MAX,
        }
    }

    /// Encode a signed machine integer.
    pub fn encode_int(self, value: i64) -> Result<Vec<u8>> {
        match self {
            Self::W32 => i32::try_from(value)
                .map(encode)
                .map_err(|_| CodecError::machine_overflow(value, self.bits())),
            Self::W64 => Ok(encode(value)),
        }
    }

    /// Encode an unsigned machine integer.
    pub fn encode_uint(self, value: u64) -> Result<Vec<u8>> {
        match self {
            Self::W32 => u32::try_from(value)
                .map(encode)
                .map_err(|_| CodecError::machine_overflow(value, self.bits())),
            Self::W64 => Ok(encode(value)),
        }
    }

    /// Decode a signed machine integer from exactly [`Self::bytes`] bytes.
    pub fn decode_int(self, bytes: &[u8]) -> Result<i64> {
        match self {
            Self::W32 => decode::<i32>(bytes).map(i64::from),
            Self::W64 => decode::<i64>(bytes),
        }
    }

    /// Decode an unsigned machine integer from exactly [`Self::bytes`] bytes.
    pub fn decode_uint(self, bytes: &[u8]) -> Result<u64> {
        match self {
            Self::W32 => decode::<u32>(bytes).map(u64::from),
            Self::W64 => decode::<u64>(bytes),
        }
    }
}

impl fmt::Display for MachineWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for MachineWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "32" => Ok(Self::W32),
            "64" => Ok(Self::W64),
            other => Err(format!("unsupported machine width: {other} (expected 32 or 64)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_64_bit() {
        assert_eq!(MachineWidth::default(), MachineWidth::W64);
        assert_eq!(MachineWidth::default().bytes(), 8);
    }

    #[test]
    fn test_w32_bounds() {
        let width = MachineWidth::W32;
        assert_eq!(width.int_min(), -2_147_483_648);
        assert_eq!(width.int_max(), 2_147_483_647);
        assert_eq!(width.uint_max(), 4_294_967_295);
    }

    #[test]
    fn test_encode_int_checks_range() {
        assert_eq!(MachineWidth::W32.encode_int(-2).unwrap(), vec![0xfe, 0xff, 0xff, 0xff]);
        assert!(MachineWidth::W32.encode_int(i64::from(i32::MAX) + 1).is_err());
        assert!(MachineWidth::W32.encode_uint(u64::from(u32::MAX) + 1).is_err());
        assert_eq!(MachineWidth::W64.encode_int(1).unwrap().len(), 8);
    }

    #[test]
    fn test_decode_uses_configured_width() {
        assert_eq!(MachineWidth::W32.decode_int(&[1, 0, 0, 0]).unwrap(), 1);
        assert!(MachineWidth::W64.decode_int(&[1, 0, 0, 0]).is_err());
        assert_eq!(
            MachineWidth::W64
                .decode_uint(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff])
                .unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("32".parse::<MachineWidth>().unwrap(), MachineWidth::W32);
        assert_eq!(" 64 ".parse::<MachineWidth>().unwrap(), MachineWidth::W64);
        assert!("16".parse::<MachineWidth>().is_err());
    }
}
