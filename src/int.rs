//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{DecodeError, ErrorKind, Pos};
use crate::mode::Mode;


//------------ Integer -------------------------------------------------------

/// An INTEGER value.
///
/// As integers are variable length in BER, this type is a wrapper atop the
/// underlying `Bytes` value containing the raw content octets. The value is
/// always a signed integer.
///
/// Values created from native integers always carry the minimal encoding.
/// Values decoded in BER mode may carry redundant leading octets, which are
/// preserved so the value re-encodes to its input in BER but are stripped
/// when producing the canonical DER content.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content
/// octets providing a variable-length, big-endian, two’s complement byte
/// sequence of that integer. Thus, the most significant bit of the first
/// octet serves as the sign bit. There is always at least one content
/// octet. DER requires the shortest sequence that still preserves the sign.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from the content octets of a decoded value.
    ///
    /// In DER mode, a redundant leading octet is rejected. Note that a
    /// leading zero octet is not redundant if the following octet has its
    /// most significant bit set: it is what keeps the value positive.
    pub fn from_content(
        content: Bytes, mode: Mode, pos: Pos
    ) -> Result<Self, DecodeError> {
        if content.is_empty() {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "empty INTEGER content", pos
            ))
        }
        if mode.is_der() {
            match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
                (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
                    return Err(DecodeError::with_msg(
                        ErrorKind::InvalidPrimitiveContent,
                        "non-minimal INTEGER content", pos
                    ))
                }
                _ => { }
            }
        }
        Ok(Integer(content))
    }

    /// Returns the raw content octets of the value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the value is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map_or(false, |x| x & 0x80 != 0)
    }

    /// Returns the minimal content octets.
    ///
    /// This is the content with any redundant leading octets a BER decode
    /// may have left in place removed. It is what DER encoding emits.
    pub(crate) fn der_content(&self) -> &[u8] {
        let mut slice = self.0.as_ref();
        while slice.len() > 1 && (
            (slice[0] == 0 && slice[1] & 0x80 == 0)
            || (slice[0] == 0xFF && slice[1] & 0x80 != 0)
        ) {
            slice = &slice[1..];
        }
        slice
    }

    /// Converts the value into an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        let slice = self.der_content();
        if slice.len() > 16 {
            return None
        }
        let mut res = if self.is_negative() { -1i128 } else { 0 };
        for &octet in slice {
            res = res << 8 | i128::from(octet);
        }
        Some(res)
    }

    /// Converts the value into an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        let res = self.to_i128()?;
        if res < i64::MIN as i128 || res > i64::MAX as i128 {
            None
        }
        else {
            Some(res as i64)
        }
    }

    /// Converts the value into a `u128` if it is unsigned and fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.is_negative() {
            return None
        }
        let mut slice = self.der_content();
        if slice.first() == Some(&0) {
            slice = &slice[1..];
        }
        if slice.len() > 16 {
            return None
        }
        let mut res = 0u128;
        for &octet in slice {
            res = res << 8 | u128::from(octet);
        }
        Some(res)
    }

    /// Converts the value into a `u64` if it is unsigned and fits.
    pub fn to_u64(&self) -> Option<u64> {
        let res = self.to_u128()?;
        if res > u64::MAX as u128 {
            None
        }
        else {
            Some(res as u64)
        }
    }
}


//--- From for the native integer types

/// Returns the minimal two’s complement suffix of the given octets.
fn minimal(octets: &[u8]) -> &[u8] {
    let mut slice = octets;
    while slice.len() > 1 && (
        (slice[0] == 0 && slice[1] & 0x80 == 0)
        || (slice[0] == 0xFF && slice[1] & 0x80 != 0)
    ) {
        slice = &slice[1..];
    }
    slice
}

macro_rules! from_signed {
    ( $( $type:ident ),* ) => { $(
        impl From<$type> for Integer {
            fn from(val: $type) -> Self {
                Integer(Bytes::copy_from_slice(minimal(&val.to_be_bytes())))
            }
        }
    )* }
}

macro_rules! from_unsigned {
    ( $( $type:ident ),* ) => { $(
        impl From<$type> for Integer {
            fn from(val: $type) -> Self {
                let octets = val.to_be_bytes();
                let mut slice = octets.as_ref();
                while slice.len() > 1 && slice[0] == 0 && slice[1] < 0x80 {
                    slice = &slice[1..];
                }
                if slice[0] & 0x80 != 0 {
                    let mut res = Vec::with_capacity(slice.len() + 1);
                    res.push(0);
                    res.extend_from_slice(slice);
                    Integer(res.into())
                }
                else {
                    Integer(Bytes::copy_from_slice(slice))
                }
            }
        }
    )* }
}

from_signed!(i8, i16, i32, i64, i128);
from_unsigned!(u8, u16, u32, u64, u128);


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn content(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn from_native() {
        assert_eq!(Integer::from(0i64).as_slice(), b"\x00");
        assert_eq!(Integer::from(127i64).as_slice(), b"\x7f");
        assert_eq!(Integer::from(128i64).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(256i64).as_slice(), b"\x01\x00");
        assert_eq!(Integer::from(-1i64).as_slice(), b"\xff");
        assert_eq!(Integer::from(-128i64).as_slice(), b"\x80");
        assert_eq!(Integer::from(-129i64).as_slice(), b"\xff\x7f");
        assert_eq!(Integer::from(0u8).as_slice(), b"\x00");
        assert_eq!(Integer::from(128u32).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(u64::MAX).as_slice(),
            b"\x00\xff\xff\xff\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn to_native() {
        for val in [0i64, 1, 127, 128, 255, 256, -1, -128, -129, i64::MAX,
            i64::MIN
        ] {
            assert_eq!(Integer::from(val).to_i64(), Some(val));
        }
        assert_eq!(Integer::from(42u8).to_u64(), Some(42));
        assert_eq!(Integer::from(-1i8).to_u64(), None);
        assert_eq!(Integer::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(Integer::from(i128::MIN).to_i64(), None);
    }

    #[test]
    fn der_rejects_redundant_octets() {
        // Value 1 with an unnecessary leading zero.
        assert!(
            Integer::from_content(
                content(b"\x00\x01"), Mode::Der, 0.into()
            ).is_err()
        );
        // Value -1 with an unnecessary leading 0xFF.
        assert!(
            Integer::from_content(
                content(b"\xff\xff"), Mode::Der, 0.into()
            ).is_err()
        );
        // 128 needs its leading zero to stay positive.
        assert!(
            Integer::from_content(
                content(b"\x00\x80"), Mode::Der, 0.into()
            ).is_ok()
        );
        assert!(
            Integer::from_content(
                content(b""), Mode::Der, 0.into()
            ).is_err()
        );
    }

    #[test]
    fn ber_keeps_padding_but_der_content_strips_it() {
        let val = Integer::from_content(
            content(b"\x00\x01"), Mode::Ber, 0.into()
        ).unwrap();
        assert_eq!(val.as_slice(), b"\x00\x01");
        assert_eq!(val.der_content(), b"\x01");
        assert_eq!(val.to_i64(), Some(1));
    }
}
