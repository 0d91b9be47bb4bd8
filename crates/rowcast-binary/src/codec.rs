//! Little-endian encode/decode for fixed-width scalars.

use crate::error::{CodecError, Result};

/// A scalar with a single fixed-width little-endian byte layout.
pub trait FixedWidth: Sized + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Encode to exactly [`Self::WIDTH`] bytes.
    fn to_le(self) -> Vec<u8>;

    /// Decode from exactly [`Self::WIDTH`] bytes.
    fn from_le(bytes: &[u8]) -> Result<Self>;
}

macro_rules! fixed_width {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const NAME: &'static str = $name;

                fn to_le(self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }

                fn from_le(bytes: &[u8]) -> Result<Self> {
                    let array: [u8; std::mem::size_of::<$ty>()] = bytes
                        .try_into()
                        .map_err(|_| CodecError::width_mismatch($name, Self::WIDTH, bytes.len()))?;
                    Ok(<$ty>::from_le_bytes(array))
                }
            }
        )*
    };
}

fixed_width! {
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    f32 => "float32",
    f64 => "float64",
}

impl FixedWidth for bool {
    const WIDTH: usize = 1;
    const NAME: &'static str = "bool";

    fn to_le(self) -> Vec<u8> {
        vec![u8::from(self)]
    }

    fn from_le(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [0] => Ok(false),
            [1] => Ok(true),
            [byte] => Err(CodecError::InvalidBool { byte: *byte }),
            _ => Err(CodecError::width_mismatch(
                Self::NAME,
                Self::WIDTH,
                bytes.len(),
            )),
        }
    }
}

/// Encode a scalar to its fixed-width little-endian layout.
pub fn encode<T: FixedWidth>(value: T) -> Vec<u8> {
    value.to_le()
}

/// Decode a scalar, failing unless `bytes` is exactly `T::WIDTH` long.
pub fn decode<T: FixedWidth>(bytes: &[u8]) -> Result<T> {
    T::from_le(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(i8::WIDTH, 1);
        assert_eq!(u16::WIDTH, 2);
        assert_eq!(f32::WIDTH, 4);
        assert_eq!(u64::WIDTH, 8);
        assert_eq!(bool::WIDTH, 1);
    }

    #[test]
    fn test_little_endian_layout() {
        assert_eq!(encode(0x0102_i16), vec![0x02, 0x01]);
        assert_eq!(encode(-1i32), vec![0xff; 4]);
        assert_eq!(encode(1.0f32), vec![0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(encode(true), vec![0x01]);
        assert_eq!(encode(false), vec![0x00]);
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        let err = decode::<i16>(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, CodecError::width_mismatch("int16", 2, 3));
        assert!(decode::<f64>(&[]).is_err());
        assert!(decode::<bool>(&[0, 1]).is_err());
    }

    #[test]
    fn test_decode_bool_strict() {
        assert!(decode::<bool>(&[1]).unwrap());
        assert!(!decode::<bool>(&[0]).unwrap());
        assert_eq!(
            decode::<bool>(&[2]).unwrap_err(),
            CodecError::InvalidBool { byte: 2 }
        );
    }
}
