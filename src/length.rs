//! The length octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::io;
use crate::decode::{DecodeError, ErrorKind, SliceSource};
use crate::mode::Mode;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets are one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. The first octet value 0xFF is reserved.
///
/// Under DER rules, a definite length must be encoded in the minimum
/// number of octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A length value in definite form, providing the actual length.
    Definite(usize),

    /// A length value in indefinite form.
    ///
    /// The content of such a value extends until an end-of-contents marker.
    Indefinite,
}

impl Length {
    /// Parses a length from the beginning of a source.
    ///
    /// In DER mode, a definite length using more octets than necessary is
    /// rejected. Whether an indefinite length is acceptable depends on the
    /// value it belongs to, so that check is left to the caller.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode
    ) -> Result<Self, DecodeError> {
        let start = source.pos();
        let first = source.take_u8()?;

        // Short form.
        if first & 0x80 == 0 {
            return Ok(Length::Definite(first as usize))
        }

        // Indefinite form.
        if first == 0x80 {
            return Ok(Length::Indefinite)
        }

        // 0xFF, i.e., 127 following octets, is reserved.
        if first == 0xFF {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidLengthEncoding,
                "reserved length octet", start
            ))
        }

        // Long form.
        let count = (first & 0x7F) as usize;
        let octets = source.take_slice(count)?;
        if mode.is_der() {
            // There must not be a shorter encoding: no leading zero octet
            // and no long form where the short form would have done.
            if octets[0] == 0 {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidLengthEncoding,
                    "leading zero in length octets", start
                ))
            }
            if count == 1 && octets[0] < 0x80 {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidLengthEncoding,
                    "long form length below 128", start
                ))
            }
        }
        let octets = match octets.iter().position(|&x| x != 0) {
            Some(idx) => &octets[idx..],
            None => return Ok(Length::Definite(0)),
        };
        if octets.len() > std::mem::size_of::<usize>() {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidLengthEncoding,
                "length too large", start
            ))
        }
        let mut res = 0usize;
        for &octet in octets {
            res = res << 8 | octet as usize;
        }
        Ok(Length::Definite(res))
    }

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns the number of octets of the minimal encoding of `len`.
    pub fn encoded_len(len: usize) -> usize {
        if len < 0x80 {
            1
        }
        else {
            let width = std::mem::size_of::<usize>()
                - len.leading_zeros() as usize / 8;
            width + 1
        }
    }

    /// Appends the minimal encoding of a definite length to `target`.
    pub fn append_definite(len: usize, target: &mut Vec<u8>) {
        if len < 0x80 {
            target.push(len as u8);
        }
        else {
            let start = len.leading_zeros() as usize / 8;
            let octets = &len.to_be_bytes()[start..];
            target.push(0x80 | octets.len() as u8);
            target.extend_from_slice(octets);
        }
    }

    /// Writes the minimal encoding of a definite length to the writer.
    pub fn write_definite<W: io::Write>(
        len: usize, target: &mut W
    ) -> Result<(), io::Error> {
        if len < 0x80 {
            target.write_all(&[len as u8])
        }
        else {
            let start = len.leading_zeros() as usize / 8;
            let octets = &len.to_be_bytes()[start..];
            target.write_all(&[0x80 | octets.len() as u8])?;
            target.write_all(octets)
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take_from(data: &[u8], mode: Mode) -> Result<Length, DecodeError> {
        let mut source = SliceSource::new(data);
        let res = Length::take_from(&mut source, mode)?;
        assert_eq!(source.remaining(), 0, "trailing data");
        Ok(res)
    }

    #[test]
    fn ber_take_from() {
        let take = |data| take_from(data, Mode::Ber).map(Length::definite);

        assert_eq!(take(b"\x00").unwrap(), Some(0x00));
        assert_eq!(take(b"\x12").unwrap(), Some(0x12));
        assert_eq!(take(b"\x7f").unwrap(), Some(0x7f));
        assert_eq!(take(b"\x80").unwrap(), None);
        assert_eq!(take(b"\x81\x00").unwrap(), Some(0));
        assert_eq!(take(b"\x81\xf0").unwrap(), Some(0xF0));
        assert_eq!(take(b"\x82\x00\x00").unwrap(), Some(0));
        assert_eq!(take(b"\x82\xf0\x0e").unwrap(), Some(0xF00E));
        assert_eq!(take(b"\x82\x00\x0e").unwrap(), Some(0x0E));
        assert_eq!(
            take(b"\xff").unwrap_err().kind(),
            ErrorKind::InvalidLengthEncoding
        );
        assert_eq!(
            take(b"\x82\x01").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn der_take_from() {
        let take = |data| take_from(data, Mode::Der).map(Length::definite);

        assert_eq!(take(b"\x00").unwrap(), Some(0x00));
        assert_eq!(take(b"\x12").unwrap(), Some(0x12));
        assert_eq!(take(b"\x7f").unwrap(), Some(0x7f));
        assert_eq!(take(b"\x80").unwrap(), None);
        assert_eq!(take(b"\x81\x80").unwrap(), Some(0x80));
        assert_eq!(take(b"\x81\xf0").unwrap(), Some(0xF0));
        assert_eq!(take(b"\x82\xf0\x0e").unwrap(), Some(0xF00E));
        for data in [
            b"\x81\x00".as_ref(), b"\x81\x7f", b"\x82\x00\x00",
            b"\x82\x00\x0e", b"\xff",
        ] {
            assert_eq!(
                take(data).unwrap_err().kind(),
                ErrorKind::InvalidLengthEncoding,
                "accepted {:?}", data
            );
        }
    }

    #[test]
    fn encode() {
        fn step(len: usize, expected: &[u8]) {
            let mut vec = Vec::new();
            Length::append_definite(len, &mut vec);
            assert_eq!(vec.as_slice(), expected, "append failed for {}", len);
            assert_eq!(Length::encoded_len(len), expected.len());

            let mut vec = Vec::new();
            Length::write_definite(len, &mut vec).unwrap();
            assert_eq!(vec.as_slice(), expected, "write failed for {}", len);
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
    }
}
