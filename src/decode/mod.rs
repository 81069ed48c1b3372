//! Parsing BER encoded data into a value tree.
//!
//! This module provides the machinery turning a slice of encoded octets
//! into a [`Value`]. The easiest way to use it is through
//! [`Value::from_der`] and [`Value::from_ber`] or through [`Mode::decode`].
//!
//! Decoding never panics on malformed input. Every failure is returned as
//! a [`DecodeError`] carrying an [`ErrorKind`] and the position in the
//! input data it was discovered at; nothing is silently repaired or
//! downgraded. The only retry knob is the mode: callers that receive a
//! strictness error from a DER decode can retry in BER mode.
//!
//! [`Value`]: ../enum.Value.html
//! [`Value::from_der`]: ../enum.Value.html#method.from_der
//! [`Value::from_ber`]: ../enum.Value.html#method.from_ber
//! [`Mode::decode`]: ../enum.Mode.html#method.decode
//! [`DecodeError`]: struct.DecodeError.html
//! [`ErrorKind`]: enum.ErrorKind.html

pub use self::error::{DecodeError, ErrorKind, Pos};
pub use self::source::SliceSource;

mod error;
mod source;

use bytes::Bytes;
use crate::bstring::BitString;
use crate::int::Integer;
use crate::length::Length;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::ostring::OctetString;
use crate::string::{Ia5String, PrintableString, Utf8String};
use crate::tag::Tag;
use crate::time::{GeneralizedTime, UtcTime};
use crate::value::{Tagged, Unknown, Value};


/// The maximum depth of nested constructed values.
const MAX_DEPTH: usize = 500;


/// Decodes a single value from the given data.
///
/// The data must contain exactly one encoded value. Trailing octets are an
/// error.
pub fn decode(data: &[u8], mode: Mode) -> Result<Value, DecodeError> {
    let mut source = SliceSource::new(data);
    let value = take_value_from(&mut source, mode, 0)?;
    if source.remaining() > 0 {
        return Err(source.err_msg(
            ErrorKind::ChildLengthMismatch, "trailing data after value"
        ))
    }
    Ok(value)
}

/// Takes a single value from the beginning of the source.
fn take_value_from(
    source: &mut SliceSource, mode: Mode, depth: usize
) -> Result<Value, DecodeError> {
    let start = source.pos();
    let (tag, constructed) = Tag::take_from(source)?;
    if tag == Tag::END_OF_VALUE && !constructed {
        return Err(DecodeError::with_msg(
            ErrorKind::InvalidTagEncoding,
            "end-of-contents outside an indefinite length value", start
        ))
    }
    let len_pos = source.pos();
    match Length::take_from(source, mode)? {
        Length::Definite(len) => {
            // A child claiming more octets than are left in its parent’s
            // span is caught right here, at its length octets.
            if let Some(limit) = source.limit() {
                if len > limit {
                    return Err(DecodeError::with_msg(
                        ErrorKind::ChildLengthMismatch,
                        "child length exceeds parent length", len_pos
                    ))
                }
            }
            if constructed {
                take_constructed(source, tag, len, mode, depth)
            }
            else {
                let content_pos = source.pos();
                let content = Bytes::copy_from_slice(
                    source.take_slice(len)?
                );
                primitive_value(tag, content, mode, content_pos)
            }
        }
        Length::Indefinite => {
            if mode.is_der() {
                Err(DecodeError::new(
                    ErrorKind::IndefiniteLengthNotAllowed, len_pos
                ))
            }
            else if !constructed {
                Err(DecodeError::with_msg(
                    ErrorKind::InvalidLengthEncoding,
                    "indefinite length on a primitive value", len_pos
                ))
            }
            else {
                take_indefinite(source, tag, mode, depth)
            }
        }
    }
}

/// Takes the content of a definite length constructed value.
fn take_constructed(
    source: &mut SliceSource, tag: Tag, len: usize, mode: Mode,
    depth: usize
) -> Result<Value, DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(source.err(ErrorKind::DepthLimitExceeded))
    }
    let outer = source.set_limit(Some(len));
    let content_pos = source.pos();
    let mut elements = Vec::new();
    while source.remaining() > 0 {
        elements.push(take_value_from(source, mode, depth + 1)?);
    }
    if source.limit() != Some(0) {
        // The span hasn’t ended, the data has.
        return Err(source.err(ErrorKind::TruncatedInput))
    }
    source.set_limit(outer.map(|limit| limit - len));
    constructed_value(tag, elements, mode, content_pos)
}

/// Takes the content of an indefinite length constructed value.
///
/// The content runs until the end-of-contents marker, the two zero octets
/// `00 00`.
fn take_indefinite(
    source: &mut SliceSource, tag: Tag, mode: Mode, depth: usize
) -> Result<Value, DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(source.err(ErrorKind::DepthLimitExceeded))
    }
    let content_pos = source.pos();
    let mut elements = Vec::new();
    loop {
        if source.peek() == Some(0) {
            source.take_u8()?;
            let len_pos = source.pos();
            if source.take_u8()? != 0 {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidLengthEncoding,
                    "end-of-contents with non-zero length", len_pos
                ))
            }
            break
        }
        elements.push(take_value_from(source, mode, depth + 1)?);
    }
    constructed_value(tag, elements, mode, content_pos)
}

/// Returns whether the tag names a universal type with primitive encoding.
fn is_primitive_type(tag: Tag) -> bool {
    matches!(tag,
        Tag::BOOLEAN | Tag::INTEGER | Tag::BIT_STRING | Tag::OCTET_STRING
        | Tag::NULL | Tag::OID | Tag::UTF8_STRING | Tag::PRINTABLE_STRING
        | Tag::IA5_STRING | Tag::UTC_TIME | Tag::GENERALIZED_TIME
    )
}

/// Builds the value for a decoded constructed value.
fn constructed_value(
    tag: Tag, elements: Vec<Value>, mode: Mode, content_pos: Pos
) -> Result<Value, DecodeError> {
    match tag {
        Tag::SEQUENCE => Ok(Value::Sequence(elements.into())),
        Tag::SET => {
            if mode.is_der() {
                // DER wants the elements ordered by their encoding. An
                // out-of-order set is an error, never silently re-sorted.
                let encoded: Vec<_> =
                    elements.iter().map(Value::to_der).collect();
                if encoded.windows(2).any(|pair| pair[0] > pair[1]) {
                    return Err(DecodeError::new(
                        ErrorKind::UnsortedSetElements, content_pos
                    ))
                }
            }
            Ok(Value::Set(elements.into()))
        }
        _ if tag.is_universal() => {
            if is_primitive_type(tag) {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidPrimitiveContent,
                    "constructed encoding of a primitive type",
                    content_pos
                ))
            }
            // An unrecognized universal type. Keep the encoded children
            // as opaque content.
            let mut content = Vec::new();
            for element in &elements {
                let encoded = match mode {
                    Mode::Der => element.to_der(),
                    Mode::Ber => element.to_ber(),
                };
                content.extend_from_slice(&encoded)
            }
            Ok(Unknown::new(tag, true, content).into())
        }
        _ => {
            // A constructed value of the other classes is a tagged value.
            // A single child is taken to be explicitly tagged; anything
            // else must be an implicitly tagged SEQUENCE.
            let mut elements = elements;
            if elements.len() == 1 {
                let inner = elements.pop().expect("checked length");
                Ok(Tagged::explicit(tag, inner).into())
            }
            else {
                Ok(Tagged::implicit(
                    tag, Value::Sequence(elements.into())
                ).into())
            }
        }
    }
}

/// Builds the value for a decoded primitive value.
fn primitive_value(
    tag: Tag, content: Bytes, mode: Mode, pos: Pos
) -> Result<Value, DecodeError> {
    match tag {
        Tag::BOOLEAN => {
            if content.len() != 1 {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidPrimitiveContent,
                    "BOOLEAN content must be a single octet", pos
                ))
            }
            if mode.is_der() && content[0] != 0 && content[0] != 0xFF {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidPrimitiveContent,
                    "non-canonical BOOLEAN content", pos
                ))
            }
            Ok(Value::Boolean(content[0] != 0))
        }
        Tag::INTEGER => {
            Integer::from_content(content, mode, pos).map(Value::Integer)
        }
        Tag::BIT_STRING => {
            BitString::from_content(content, mode, pos)
                .map(Value::BitString)
        }
        Tag::OCTET_STRING => {
            Ok(Value::OctetString(OctetString::new(content)))
        }
        Tag::NULL => {
            if !content.is_empty() {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidPrimitiveContent,
                    "NULL content must be empty", pos
                ))
            }
            Ok(Value::Null)
        }
        Tag::OID => Oid::from_content(content, pos).map(Value::Oid),
        Tag::UTF8_STRING => {
            Utf8String::from_content(content, pos).map(Value::Utf8String)
        }
        Tag::PRINTABLE_STRING => {
            PrintableString::from_content(content, pos)
                .map(Value::PrintableString)
        }
        Tag::IA5_STRING => {
            Ia5String::from_content(content, pos).map(Value::Ia5String)
        }
        Tag::UTC_TIME => {
            UtcTime::from_content(content, mode, pos).map(Value::UtcTime)
        }
        Tag::GENERALIZED_TIME => {
            GeneralizedTime::from_content(content, mode, pos)
                .map(Value::GeneralizedTime)
        }
        Tag::SEQUENCE | Tag::SET => {
            Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "primitive encoding of a constructed type", pos
            ))
        }
        _ => Ok(Unknown::new(tag, false, content).into())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn der(data: &[u8]) -> Result<Value, DecodeError> {
        Mode::Der.decode(data)
    }

    fn ber(data: &[u8]) -> Result<Value, DecodeError> {
        Mode::Ber.decode(data)
    }

    #[test]
    fn primitive_values() {
        assert_eq!(der(b"\x01\x01\xff").unwrap().as_boolean(), Some(true));
        assert_eq!(der(b"\x01\x01\x00").unwrap().as_boolean(), Some(false));
        assert!(der(b"\x05\x00").unwrap().is_null());
        assert_eq!(
            der(b"\x0c\x05hello").unwrap().as_str(), Some("hello")
        );
        assert_eq!(
            der(b"\x04\x03\x01\x02\x03").unwrap()
                .as_octet_string().unwrap().as_slice(),
            b"\x01\x02\x03"
        );
    }

    #[test]
    fn rsa_oid() {
        let value = der(
            b"\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01"
        ).unwrap();
        assert_eq!(
            value.as_oid().unwrap().to_string(), "1.2.840.113549.1.1.1"
        );
        assert_eq!(
            value.to_der().as_ref(),
            b"\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01"
        );
    }

    #[test]
    fn empty_sequence() {
        let value = der(b"\x30\x00").unwrap();
        assert!(value.as_sequence().unwrap().is_empty());
        assert_eq!(value.to_der().as_ref(), b"\x30\x00");
    }

    #[test]
    fn nested_sequence() {
        let value = der(
            b"\x30\x08\x02\x01\x2a\x30\x03\x01\x01\xff"
        ).unwrap();
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(
            seq.get(0).unwrap().as_integer().unwrap().to_i64(), Some(42)
        );
        let inner = seq.get(1).unwrap().as_sequence().unwrap();
        assert_eq!(inner.get(0).unwrap().as_boolean(), Some(true));
    }

    #[test]
    fn integer_minimality() {
        assert_eq!(
            der(b"\x02\x01\x00").unwrap()
                .as_integer().unwrap().to_i64(),
            Some(0)
        );
        // 128 needs its padding octet to stay positive.
        assert_eq!(
            der(b"\x02\x02\x00\x80").unwrap()
                .as_integer().unwrap().to_i64(),
            Some(128)
        );
        // Value 1 with redundant padding: rejected in DER, kept in BER.
        assert_eq!(
            der(b"\x02\x02\x00\x01").unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
        let value = ber(b"\x02\x02\x00\x01").unwrap();
        assert_eq!(value.to_ber().as_ref(), b"\x02\x02\x00\x01");
        assert_eq!(value.to_der().as_ref(), b"\x02\x01\x01");
    }

    #[test]
    fn child_overruns_parent() {
        // A SEQUENCE of declared length 5 whose first child claims
        // length 10. The error points at the child’s length octet.
        let err = der(
            b"\x30\x05\x04\x0a\x01\x02\x03"
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChildLengthMismatch);
        assert_eq!(err.pos(), 3.into());
    }

    #[test]
    fn redundant_tag_octet() {
        let err = der(b"\x1f\x80\x01\x00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTagEncoding);
    }

    #[test]
    fn children_must_fill_the_parent() {
        // The last child ends one octet short of the SEQUENCE length, so
        // decoding the fill octet fails as a truncated tag.
        assert_eq!(
            der(b"\x30\x04\x02\x01\x00\x1f").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn trailing_data() {
        assert_eq!(
            der(b"\x05\x00\x00").unwrap_err().kind(),
            ErrorKind::ChildLengthMismatch
        );
    }

    #[test]
    fn truncated_content() {
        assert_eq!(
            der(b"\x04\x05\x01\x02").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            der(b"\x30\x03\x02\x01").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn indefinite_length() {
        // Indefinite length constructed values work in BER only.
        let data = b"\x30\x80\x02\x01\x2a\x00\x00";
        let value = ber(data).unwrap();
        assert_eq!(
            value.as_sequence().unwrap()
                .get(0).unwrap().as_integer().unwrap().to_i64(),
            Some(42)
        );
        assert_eq!(
            der(data).unwrap_err().kind(),
            ErrorKind::IndefiniteLengthNotAllowed
        );

        // Indefinite length on a primitive value.
        assert_eq!(
            ber(b"\x04\x80\x00\x00").unwrap_err().kind(),
            ErrorKind::InvalidLengthEncoding
        );

        // Missing end-of-contents marker.
        assert_eq!(
            ber(b"\x30\x80\x02\x01\x2a").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn der_rejects_unsorted_sets() {
        let sorted = b"\x31\x06\x02\x01\x01\x02\x01\x02";
        let unsorted = b"\x31\x06\x02\x01\x02\x02\x01\x01";
        assert!(der(sorted).is_ok());
        assert_eq!(
            der(unsorted).unwrap_err().kind(),
            ErrorKind::UnsortedSetElements
        );
        // BER keeps the insertion order as-is.
        let value = ber(unsorted).unwrap();
        assert_eq!(value.to_ber().as_ref(), unsorted.as_ref());
        assert_eq!(value.to_der().as_ref(), sorted.as_ref());
    }

    #[test]
    fn tagged_values() {
        // A constructed context value with a single child is explicitly
        // tagged.
        let value = der(b"\xa0\x03\x02\x01\x05").unwrap();
        let tagged = value.as_tagged().unwrap();
        assert_eq!(tagged.tag(), Tag::CTX_0);
        assert!(tagged.is_explicit());
        assert_eq!(tagged.inner().as_integer().unwrap().to_i64(), Some(5));

        // A primitive context value stays opaque.
        let value = der(b"\x81\x01\x05").unwrap();
        let unknown = value.as_unknown().unwrap();
        assert_eq!(unknown.tag(), Tag::CTX_1);
        assert!(!unknown.is_constructed());
        assert_eq!(unknown.content(), b"\x05");

        // Multiple children: an implicitly tagged SEQUENCE.
        let value = der(b"\xa2\x06\x02\x01\x01\x02\x01\x02").unwrap();
        let tagged = value.as_tagged().unwrap();
        assert!(!tagged.is_explicit());
        assert_eq!(tagged.inner().as_sequence().unwrap().len(), 2);
        assert_eq!(
            value.to_der().as_ref(), b"\xa2\x06\x02\x01\x01\x02\x01\x02"
        );
    }

    #[test]
    fn unknown_universal_values() {
        // An unrecognized universal primitive type.
        let value = der(b"\x0a\x01\x02").unwrap();
        let unknown = value.as_unknown().unwrap();
        assert!(unknown.tag().is_universal());
        assert_eq!(unknown.tag().number(), 10);
        assert_eq!(value.to_der().as_ref(), b"\x0a\x01\x02");

        // An unrecognized universal constructed type.
        let value = der(b"\x2b\x03\x02\x01\x07").unwrap();
        let unknown = value.as_unknown().unwrap();
        assert!(unknown.is_constructed());
        assert_eq!(unknown.content(), b"\x02\x01\x07");
        assert_eq!(value.to_der().as_ref(), b"\x2b\x03\x02\x01\x07");
    }

    #[test]
    fn constructed_form_of_primitive_types() {
        // BER constructed string segmentation is not part of the tree
        // model and is rejected.
        assert_eq!(
            ber(b"\x24\x04\x04\x02ab").unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
        // Primitive SEQUENCE is just as wrong the other way around.
        assert_eq!(
            ber(b"\x10\x00").unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
    }

    #[test]
    fn stray_end_of_contents() {
        assert_eq!(
            ber(b"\x00\x00").unwrap_err().kind(),
            ErrorKind::InvalidTagEncoding
        );
    }

    #[test]
    fn depth_limit() {
        // 600 nested SEQUENCEs with an empty one innermost.
        let mut data = vec![0x30, 0x00];
        for _ in 0..600 {
            let mut outer = vec![0x30];
            Length::append_definite(data.len(), &mut outer);
            outer.extend_from_slice(&data);
            data = outer;
        }
        assert_eq!(
            ber(&data).unwrap_err().kind(),
            ErrorKind::DepthLimitExceeded
        );
    }

    #[test]
    fn boolean_content() {
        assert_eq!(
            der(b"\x01\x01\x01").unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
        assert_eq!(ber(b"\x01\x01\x01").unwrap().as_boolean(), Some(true));
        assert!(der(b"\x01\x02\x00\x00").is_err());
        assert!(der(b"\x01\x00").is_err());
    }

    #[test]
    fn der_reencoding_is_idempotent() {
        for data in [
            b"\x30\x00".as_ref(),
            b"\x31\x00",
            b"\x02\x01\x80",
            b"\x03\x02\x04\xf0",
            b"\x30\x0b\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01",
            b"\xa0\x03\x02\x01\x05",
            b"\x31\x06\x02\x01\x01\x02\x01\x02",
            b"\x17\x0d\x32\x36\x30\x38\x32\x34\x31\x35\x34\x35\x30\x30\x5a",
        ] {
            let value = der(data).unwrap();
            assert_eq!(
                value.to_der().as_ref(), data, "re-encode of {:?}", data
            );
            assert_eq!(value, der(data).unwrap());
        }
    }
}
