//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, io};
use crate::decode::{DecodeError, ErrorKind, SliceSource};


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// Every tag belongs to one of four classes. The universal class is reserved
/// for the types defined by ASN.1 itself, the other three are available to
/// applications and their protocols.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// The universal class of the ASN.1 built-in types.
    Universal,

    /// The application class.
    Application,

    /// The context-specific class.
    ContextSpecific,

    /// The private class.
    Private,
}


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each BER encoded value starts with a sequence of one or more octets
/// called the _identifier octets._ They encode both the tag of the value as
/// well as whether the value uses primitive or constructed encoding. The
/// `Tag` type represents the tag only; whether a value is primitive or
/// constructed travels next to it.
///
/// The tag in turn consists of two parts: the class and the number – the
/// `Tag` type includes both of them.
///
/// # Limitations
///
/// We can only decode up to four identifier octets. That is, we only support
/// tag numbers between 0 and 0x1f_ffff.
//
//  The tag is stored with the constructed bit always cleared.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag([u8; 4]);

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for checking whether the value is a primitive.
    ///
    /// A value of 0 indicates primitive.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number bits of a single octet identifier.
    ///
    /// (5 bits – 0b0001_1111).
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The mask for the data bits of subsequent identifier octets.
    ///
    /// (7 bits – 0b0111_1111).
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The continuation bit of subsequent identifier octets.
    ///
    /// (1 bit – 0b1000_0000, it is cleared in the last octet).
    const LAST_OCTET_MASK: u8 = 0x80;

    /// The largest tag number possible with four identifier octets.
    const MAX_VAL_SPAN_3_OCTETS: u32 = 0x001f_ffff;

    /// The largest tag number possible with three identifier octets.
    const MAX_VAL_SPAN_2_OCTETS: u32 = 0x3fff;

    /// The largest tag number possible with two identifier octets.
    const MAX_VAL_SPAN_1_OCTET: u32 = 0x7f;

    /// The largest tag number possible with a single identifier octet.
    const MAX_VAL_FOURTH_OCTET: u32 = 0x1e;

    /// The class bits for the ‘universal’ class.
    const UNIVERSAL: u8 = 0x00;

    /// The class bits for the ‘application’ class.
    const APPLICATION: u8 = 0x40;

    /// The class bits for the ‘context-specific’ class.
    const CONTEXT_SPECIFIC: u8 = 0x80;

    /// The class bits for the ‘private’ class.
    const PRIVATE: u8 = 0xc0;

    /// The tag marking the end-of-contents in an indefinite length value.
    ///
    /// This is UNIVERSAL 0.
    pub const END_OF_VALUE: Self = Tag([0, 0, 0, 0]);

    //--- Universal Tags
    //
    // See clause 8.4 of X.690.

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag([1, 0, 0, 0]);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag([2, 0, 0, 0]);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag([3, 0, 0, 0]);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag([4, 0, 0, 0]);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag([5, 0, 0, 0]);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag([6, 0, 0, 0]);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Tag([12, 0, 0, 0]);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Tag([16, 0, 0, 0]);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Tag([17, 0, 0, 0]);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag([19, 0, 0, 0]);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag([22, 0, 0, 0]);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag([23, 0, 0, 0]);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Tag([24, 0, 0, 0]);

    //--- The first few context-specific tags.

    /// The context specific tag [0].
    pub const CTX_0: Self = Tag([Tag::CONTEXT_SPECIFIC, 0, 0, 0]);

    /// The context specific tag [1].
    pub const CTX_1: Self = Tag([Tag::CONTEXT_SPECIFIC | 1, 0, 0, 0]);

    /// The context specific tag [2].
    pub const CTX_2: Self = Tag([Tag::CONTEXT_SPECIFIC | 2, 0, 0, 0]);

    /// The context specific tag [3].
    pub const CTX_3: Self = Tag([Tag::CONTEXT_SPECIFIC | 3, 0, 0, 0]);
}

impl Tag {
    /// Encodes a class and number into the identifier representation.
    ///
    /// There are two forms:
    /// * low tag number (for tag numbers between 0 and 30):
    ///     One octet. Bits 8 and 7 specify the class, bit 6 indicates
    ///     whether the encoding is primitive (0), and bits 5-1 give the tag
    ///     number.
    /// * high tag number (for tag numbers 31 and greater):
    ///     Two or more octets. First octet is as in low-tag-number form,
    ///     except that bits 5-1 all have value 1. Second and following
    ///     octets give the tag number, base 128, most significant digit
    ///     first, with as few digits as possible, and with bit 8 of each
    ///     octet except the last set to 1.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// `Self::MAX_VAL_SPAN_3_OCTETS`.
    #[inline]
    fn new(class_mask: u8, number: u32) -> Self {
        assert!(number <= Tag::MAX_VAL_SPAN_3_OCTETS);
        if number <= Tag::MAX_VAL_FOURTH_OCTET {
            Tag([class_mask | number as u8, 0, 0, 0])
        } else if number <= Tag::MAX_VAL_SPAN_1_OCTET {
            Tag([
                class_mask | Tag::SINGLEBYTE_DATA_MASK,
                number as u8, 0, 0
            ])
        } else if number <= Tag::MAX_VAL_SPAN_2_OCTETS {
            let first_part = {
                Tag::MULTIBYTE_DATA_MASK & ((number >> 7) as u8)
                | Tag::LAST_OCTET_MASK
            };
            let second_part = Tag::MULTIBYTE_DATA_MASK & (number as u8);
            Tag([
                class_mask | Tag::SINGLEBYTE_DATA_MASK, first_part,
                second_part, 0
            ])
        } else {
            let first_part = {
                Tag::MULTIBYTE_DATA_MASK & ((number >> 14) as u8)
                | Tag::LAST_OCTET_MASK
            };
            let second_part = {
                Tag::MULTIBYTE_DATA_MASK & ((number >> 7) as u8)
                | Tag::LAST_OCTET_MASK
            };
            let third_part = Tag::MULTIBYTE_DATA_MASK & (number as u8);
            Tag([
                class_mask | Tag::SINGLEBYTE_DATA_MASK, first_part,
                second_part, third_part
            ])
        }
    }

    /// Creates a new tag in the universal class with the given tag number.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// `MAX_VAL_SPAN_3_OCTETS`.
    pub fn universal(number: u32) -> Self {
        Tag::new(Tag::UNIVERSAL, number)
    }

    /// Creates a new tag in the application class with the given tag number.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// `MAX_VAL_SPAN_3_OCTETS`.
    pub fn application(number: u32) -> Self {
        Tag::new(Tag::APPLICATION, number)
    }

    /// Creates a new tag in the context specific class.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// `MAX_VAL_SPAN_3_OCTETS`.
    pub fn ctx(number: u32) -> Self {
        Tag::new(Tag::CONTEXT_SPECIFIC, number)
    }

    /// Creates a new tag in the private class with the given tag number.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// `MAX_VAL_SPAN_3_OCTETS`.
    pub fn private(number: u32) -> Self {
        Tag::new(Tag::PRIVATE, number)
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        match self.0[0] & Self::CLASS_MASK {
            Self::UNIVERSAL => Class::Universal,
            Self::APPLICATION => Class::Application,
            Self::CONTEXT_SPECIFIC => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        self.0[0] & Self::CLASS_MASK == Self::UNIVERSAL
    }

    /// Returns whether the tag is of the application class.
    pub fn is_application(self) -> bool {
        self.0[0] & Self::CLASS_MASK == Self::APPLICATION
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        self.0[0] & Self::CLASS_MASK == Self::CONTEXT_SPECIFIC
    }

    /// Returns whether the tag is of the private class.
    pub fn is_private(self) -> bool {
        self.0[0] & Self::CLASS_MASK == Self::PRIVATE
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0])
            != Tag::SINGLEBYTE_DATA_MASK
        {
            // It's a single byte identifier.
            u32::from(Tag::SINGLEBYTE_DATA_MASK & self.0[0])
        } else if Tag::LAST_OCTET_MASK & self.0[1] == 0 {
            // It's a multibyte that starts and ends in the second octet.
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1])
        } else if Tag::LAST_OCTET_MASK & self.0[2] == 0 {
            // It's a multibyte that ends in the third octet.
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1]) << 7
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[2])
        } else {
            // It's a multibyte that spans all four octets.
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1]) << 14
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[2]) << 7
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[3])
        }
    }

    /// Takes a tag from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed.
    ///
    /// The high tag number form must be minimal: a redundant leading
    /// continuation octet and a high tag number form used for a number below
    /// 31 are both rejected.
    pub fn take_from(
        source: &mut SliceSource,
    ) -> Result<(Self, bool), DecodeError> {
        let start = source.pos();
        let byte = source.take_u8()?;
        // Clear the constructed bit.
        let mut data = [byte & !Tag::CONSTRUCTED_MASK, 0, 0, 0];
        let constructed = byte & Tag::CONSTRUCTED_MASK != 0;
        if (data[0] & Tag::SINGLEBYTE_DATA_MASK)
            != Tag::SINGLEBYTE_DATA_MASK
        {
            return Ok((Tag(data), constructed))
        }
        for i in 1..=3 {
            data[i] = source.take_u8()?;
            if i == 1 && data[1] == Tag::LAST_OCTET_MASK {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidTagEncoding,
                    "redundant leading octet in tag number",
                    start
                ))
            }
            if data[i] & Tag::LAST_OCTET_MASK == 0 {
                let tag = Tag(data);
                if tag.number() <= Tag::MAX_VAL_FOURTH_OCTET {
                    return Err(DecodeError::with_msg(
                        ErrorKind::InvalidTagEncoding,
                        "high tag number form for a low tag number",
                        start
                    ))
                }
                return Ok((tag, constructed))
            }
        }
        Err(DecodeError::with_msg(
            ErrorKind::InvalidTagEncoding, "tag number too large", start
        ))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0])
            != Tag::SINGLEBYTE_DATA_MASK
        {
            1
        } else if Tag::LAST_OCTET_MASK & self.0[1] == 0 {
            2
        } else if Tag::LAST_OCTET_MASK & self.0[2] == 0 {
            3
        } else {
            4
        }
    }

    /// Appends the encoded tag to the end of `target`.
    ///
    /// If `constructed` is `true`, the encoded tag will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn append_encoded(self, constructed: bool, target: &mut Vec<u8>) {
        let mut buf = self.0;
        if constructed {
            buf[0] |= Tag::CONSTRUCTED_MASK
        }
        target.extend_from_slice(&buf[..self.encoded_len()])
    }

    /// Writes the encoded tag to the given writer.
    pub fn write_encoded<W: io::Write>(
        self,
        constructed: bool,
        target: &mut W
    ) -> Result<(), io::Error> {
        let mut buf = self.0;
        if constructed {
            buf[0] |= Tag::CONSTRUCTED_MASK
        }
        target.write_all(&buf[..self.encoded_len()])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::ContextSpecific => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[u8] = &[
        Tag::UNIVERSAL, Tag::APPLICATION, Tag::CONTEXT_SPECIFIC, Tag::PRIVATE
    ];

    fn decode(data: &[u8]) -> Result<(Tag, bool), DecodeError> {
        Tag::take_from(&mut SliceSource::new(data))
    }

    fn roundtrip(tag: Tag, number: u32) {
        let mut encoded = Vec::new();
        tag.append_encoded(false, &mut encoded);
        assert_eq!(encoded.len(), tag.encoded_len());
        let (decoded, constructed) = decode(&encoded).unwrap();
        assert!(!constructed);
        assert_eq!(decoded, tag);
        assert_eq!(decoded.number(), number);

        let mut encoded = Vec::new();
        tag.append_encoded(true, &mut encoded);
        let (decoded, constructed) = decode(&encoded).unwrap();
        assert!(constructed);
        assert_eq!(decoded, tag);
    }

    #[test]
    fn single_octet_tags() {
        for &class in CLASSES {
            for i in (0..5).chain(
                Tag::MAX_VAL_FOURTH_OCTET - 5..=Tag::MAX_VAL_FOURTH_OCTET
            ) {
                let tag = Tag::new(class, i);
                assert_eq!(tag.encoded_len(), 1);
                roundtrip(tag, i);
            }
        }
    }

    #[test]
    fn double_octet_tags() {
        for &class in CLASSES {
            for i in (Tag::MAX_VAL_FOURTH_OCTET + 1
                    ..Tag::MAX_VAL_FOURTH_OCTET + 5
            ).chain(
                Tag::MAX_VAL_SPAN_1_OCTET - 5..=Tag::MAX_VAL_SPAN_1_OCTET
            ) {
                let tag = Tag::new(class, i);
                assert_eq!(tag.encoded_len(), 2);
                roundtrip(tag, i);
            }
        }
    }

    #[test]
    fn three_octet_tags() {
        for &class in CLASSES {
            for i in (Tag::MAX_VAL_SPAN_1_OCTET + 1
                    ..Tag::MAX_VAL_SPAN_1_OCTET + 5
            ).chain(
                Tag::MAX_VAL_SPAN_2_OCTETS - 5..=Tag::MAX_VAL_SPAN_2_OCTETS
            ) {
                let tag = Tag::new(class, i);
                assert_eq!(tag.encoded_len(), 3);
                roundtrip(tag, i);
            }
        }
    }

    #[test]
    fn four_octet_tags() {
        for &class in CLASSES {
            for i in (Tag::MAX_VAL_SPAN_2_OCTETS + 1
                    ..Tag::MAX_VAL_SPAN_2_OCTETS + 5
            ).chain(
                Tag::MAX_VAL_SPAN_3_OCTETS - 5..=Tag::MAX_VAL_SPAN_3_OCTETS
            ) {
                let tag = Tag::new(class, i);
                assert_eq!(tag.encoded_len(), 4);
                roundtrip(tag, i);
            }
        }
    }

    #[test]
    fn classes() {
        assert_eq!(Tag::universal(4).class(), Class::Universal);
        assert_eq!(Tag::application(4).class(), Class::Application);
        assert_eq!(Tag::ctx(4).class(), Class::ContextSpecific);
        assert_eq!(Tag::private(4).class(), Class::Private);
        assert!(Tag::SEQUENCE.is_universal());
        assert!(Tag::CTX_2.is_context_specific());
    }

    #[test]
    fn redundant_leading_octet() {
        let err = decode(b"\x1f\x80\x01").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTagEncoding);
        assert_eq!(err.pos(), 0.into());
    }

    #[test]
    fn high_form_for_low_number() {
        assert_eq!(
            decode(b"\x1f\x1e").unwrap_err().kind(),
            ErrorKind::InvalidTagEncoding
        );
    }

    #[test]
    fn tag_number_too_large() {
        assert_eq!(
            decode(b"\xff\x81\x82\x83\x84").unwrap_err().kind(),
            ErrorKind::InvalidTagEncoding
        );
    }

    #[test]
    fn truncated_tag() {
        assert_eq!(
            decode(b"\x1f\x81").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            decode(b"").unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }
}
