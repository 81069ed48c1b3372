//! A BIT STRING value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use bytes::Bytes;
use crate::decode::{DecodeError, ErrorKind, Pos};
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A BIT STRING value.
///
/// A bit string is a sequence of bits of arbitrary length, kept here as a
/// sequence of octets plus the number of unused bits at the end of the last
/// octet.
///
/// # BER Encoding
///
/// The first content octet gives the number of unused bits in the last
/// content octet, which must be between 0 and 7 and must be 0 if there are
/// no further content octets, i.e., if the total bit length is a multiple
/// of eight. The remaining content octets carry the bits, most significant
/// bit first. DER additionally requires the unused bits themselves to be
/// zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last octet.
    unused: u8,

    /// The octets carrying the bits.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Fails if `unused` is larger than 7 or is non-zero for an empty bit
    /// string.
    pub fn new(
        unused: u8, bits: impl Into<Bytes>
    ) -> Result<Self, InvalidBitString> {
        let bits = bits.into();
        if unused > 7 || (unused > 0 && bits.is_empty()) {
            return Err(InvalidBitString(()))
        }
        Ok(BitString { unused, bits })
    }

    /// Creates a bit string from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, mode: Mode, pos: Pos
    ) -> Result<Self, DecodeError> {
        let err = |msg| DecodeError::with_msg(
            ErrorKind::InvalidPrimitiveContent, msg, pos
        );
        let unused = match content.first() {
            Some(&unused) => unused,
            None => return Err(err("empty BIT STRING content")),
        };
        if unused > 7 {
            return Err(err("invalid number of unused bits"))
        }
        let bits = content.slice(1..);
        if unused > 0 {
            let last = match bits.last() {
                Some(&last) => last,
                None => return Err(err("unused bits in empty BIT STRING")),
            };
            if mode.is_der() && last & (0xFF >> (8 - unused)) != 0 {
                return Err(err("unused bits not zero"))
            }
        }
        Ok(BitString { unused, bits })
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the total number of bits in the string.
    pub fn bit_len(&self) -> usize {
        self.bits.len() * 8 - self.unused as usize
    }

    /// Returns the octets carrying the bits.
    ///
    /// The unused bits of the last octet are included.
    pub fn octets(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns the value of the given bit, if present.
    pub fn bit(&self, idx: usize) -> Option<bool> {
        if idx >= self.bit_len() {
            return None
        }
        let octet = self.bits[idx / 8];
        Some(octet & (0x80 >> (idx % 8)) != 0)
    }
}


//------------ InvalidBitString ----------------------------------------------

/// A bit string with an illegal unused bit count was provided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidBitString(());

impl fmt::Display for InvalidBitString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid bit string")
    }
}

impl error::Error for InvalidBitString { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn content(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn new() {
        let bs = BitString::new(4, b"\x0a\xb0".as_ref()).unwrap();
        assert_eq!(bs.bit_len(), 12);
        assert_eq!(bs.unused(), 4);
        assert!(BitString::new(8, b"\x0a".as_ref()).is_err());
        assert!(BitString::new(1, b"".as_ref()).is_err());
        assert!(BitString::new(0, b"".as_ref()).unwrap().bit_len() == 0);
    }

    #[test]
    fn bits() {
        let bs = BitString::new(6, b"\x6e\x5d\xc0".as_ref()).unwrap();
        assert_eq!(bs.bit_len(), 18);
        assert_eq!(bs.bit(0), Some(false));
        assert_eq!(bs.bit(1), Some(true));
        assert_eq!(bs.bit(17), Some(true));
        assert_eq!(bs.bit(18), None);
    }

    #[test]
    fn from_content() {
        assert!(
            BitString::from_content(
                content(b"\x00\xff"), Mode::Der, 0.into()
            ).is_ok()
        );
        // Unused bit count out of range.
        assert_eq!(
            BitString::from_content(
                content(b"\x08\xff"), Mode::Der, 0.into()
            ).unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
        // Unused bits in an empty string.
        assert!(
            BitString::from_content(
                content(b"\x04"), Mode::Ber, 0.into()
            ).is_err()
        );
        // No content octets at all.
        assert!(
            BitString::from_content(
                content(b""), Mode::Ber, 0.into()
            ).is_err()
        );
        // Non-zero unused bits: rejected in DER, kept in BER.
        assert!(
            BitString::from_content(
                content(b"\x04\x0f"), Mode::Der, 0.into()
            ).is_err()
        );
        let bs = BitString::from_content(
            content(b"\x04\x0f"), Mode::Ber, 0.into()
        ).unwrap();
        assert_eq!(bs.unused(), 4);
        assert_eq!(bs.octets(), b"\x0f");
    }
}
