//! Encoding a value tree into octets.
//!
//! This is a private module. It adds the encoding methods to [`Value`] and
//! contains the machinery behind them.
//!
//! [`Value`]: ../enum.Value.html

use std::io;
use bytes::Bytes;
use crate::length::Length;
use crate::mode::Mode;
use crate::value::{Tagged, Value};


/// The complete encoding of an empty SEQUENCE.
const EMPTY_SEQUENCE: &[u8] = &[0x30, 0x00];

/// The complete encoding of an empty SET.
const EMPTY_SET: &[u8] = &[0x31, 0x00];


/// # Encoding
///
impl Value {
    /// Returns the DER encoding of the value.
    ///
    /// DER encoding is canonical: equal values always produce identical
    /// octets, independently of how the values were built up or what
    /// encoding they were decoded from.
    pub fn to_der(&self) -> Bytes {
        self.encode_to_vec(Mode::Der).into()
    }

    /// Returns the BER encoding of the value.
    ///
    /// The encoder always uses the definite length form, so the result is
    /// valid DER except for the content of values that preserve a
    /// non-canonical encoding, such as integers decoded in BER mode with
    /// redundant leading octets, and the insertion order of sets.
    pub fn to_ber(&self) -> Bytes {
        self.encode_to_vec(Mode::Ber).into()
    }

    /// Writes the encoding of the value in the given mode to a writer.
    pub fn write_encoded<W: io::Write>(
        &self, mode: Mode, target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.encode_to_vec(mode))
    }

    /// Returns the number of octets of the encoded value.
    pub fn encoded_len(&self, mode: Mode) -> usize {
        let content = content_len(self, mode);
        match *self {
            Value::Tagged(ref tagged) if !tagged.is_explicit() => {
                tagged.tag().encoded_len()
                    + Length::encoded_len(content) + content
            }
            _ => {
                self.tag().encoded_len()
                    + Length::encoded_len(content) + content
            }
        }
    }

    /// Encodes the value in the given mode into a fresh vec.
    fn encode_to_vec(&self, mode: Mode) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.encoded_len(mode));
        append_value(self, mode, &mut target);
        target
    }
}


/// Appends the complete encoding of a value to `target`.
fn append_value(value: &Value, mode: Mode, target: &mut Vec<u8>) {
    match *value {
        Value::Sequence(ref seq) if seq.is_empty() => {
            target.extend_from_slice(EMPTY_SEQUENCE)
        }
        Value::Set(ref set) if set.is_empty() => {
            target.extend_from_slice(EMPTY_SET)
        }
        Value::Tagged(ref tagged) => append_tagged(tagged, mode, target),
        _ => {
            let (constructed, content) = encoded_content(value, mode);
            value.tag().append_encoded(constructed, target);
            Length::append_definite(content.len(), target);
            target.extend_from_slice(&content);
        }
    }
}

/// Appends the complete encoding of a tagged value to `target`.
///
/// With explicit tagging, the outer value is constructed and its content is
/// the complete encoding of the inner value. With implicit tagging, the
/// inner value is encoded with its tag replaced by the outer tag while its
/// primitive or constructed form is kept.
fn append_tagged(tagged: &Tagged, mode: Mode, target: &mut Vec<u8>) {
    let (constructed, content) = if tagged.is_explicit() {
        let mut content = Vec::new();
        append_value(tagged.inner(), mode, &mut content);
        (true, content)
    }
    else {
        encoded_content(tagged.inner(), mode)
    };
    tagged.tag().append_encoded(constructed, target);
    Length::append_definite(content.len(), target);
    target.extend_from_slice(&content);
}

/// Returns the constructed flag and content octets of a value.
fn encoded_content(value: &Value, mode: Mode) -> (bool, Vec<u8>) {
    match *value {
        Value::Boolean(val) => {
            (false, vec![if val { 0xFF } else { 0x00 }])
        }
        Value::Integer(ref val) => {
            let content = match mode {
                Mode::Der => val.der_content(),
                Mode::Ber => val.as_slice(),
            };
            (false, content.into())
        }
        Value::BitString(ref val) => {
            let mut content = Vec::with_capacity(val.octets().len() + 1);
            content.push(val.unused());
            content.extend_from_slice(val.octets());
            // DER wants the unused bits zero.
            if mode.is_der() && val.unused() > 0 {
                if let Some(last) = content.last_mut() {
                    *last &= 0xFF << val.unused()
                }
            }
            (false, content)
        }
        Value::OctetString(ref val) => (false, val.as_slice().into()),
        Value::Null => (false, Vec::new()),
        Value::Oid(ref val) => (false, val.as_slice().into()),
        Value::Utf8String(ref val) => {
            (false, val.as_str().as_bytes().into())
        }
        Value::PrintableString(ref val) => {
            (false, val.as_str().as_bytes().into())
        }
        Value::Ia5String(ref val) => {
            (false, val.as_str().as_bytes().into())
        }
        Value::UtcTime(ref val) => {
            (false, val.as_str().as_bytes().into())
        }
        Value::GeneralizedTime(ref val) => {
            (false, val.as_str().as_bytes().into())
        }
        Value::Sequence(ref seq) => {
            let mut content = Vec::new();
            for element in seq {
                append_value(element, mode, &mut content)
            }
            (true, content)
        }
        Value::Set(ref set) => {
            let mut content = Vec::new();
            if mode.is_der() {
                // DER orders the elements by their encoded octets.
                let mut encoded: Vec<Vec<u8>> = set.iter().map(|element| {
                    let mut vec = Vec::new();
                    append_value(element, mode, &mut vec);
                    vec
                }).collect();
                encoded.sort();
                for element in encoded {
                    content.extend_from_slice(&element)
                }
            }
            else {
                for element in set {
                    append_value(element, mode, &mut content)
                }
            }
            (true, content)
        }
        Value::Tagged(ref tagged) => {
            if tagged.is_explicit() {
                let mut content = Vec::new();
                append_value(tagged.inner(), mode, &mut content);
                (true, content)
            }
            else {
                encoded_content(tagged.inner(), mode)
            }
        }
        Value::Unknown(ref val) => {
            (val.is_constructed(), val.content().into())
        }
    }
}

/// Returns the number of content octets of a value.
///
/// The DER reordering of set elements does not change their total length,
/// so this can recurse without actually encoding anything.
fn content_len(value: &Value, mode: Mode) -> usize {
    match *value {
        Value::Boolean(_) => 1,
        Value::Integer(ref val) => {
            match mode {
                Mode::Der => val.der_content().len(),
                Mode::Ber => val.as_slice().len(),
            }
        }
        Value::BitString(ref val) => val.octets().len() + 1,
        Value::OctetString(ref val) => val.len(),
        Value::Null => 0,
        Value::Oid(ref val) => val.as_slice().len(),
        Value::Utf8String(ref val) => val.as_str().len(),
        Value::PrintableString(ref val) => val.as_str().len(),
        Value::Ia5String(ref val) => val.as_str().len(),
        Value::UtcTime(ref val) => val.as_str().len(),
        Value::GeneralizedTime(ref val) => val.as_str().len(),
        Value::Sequence(ref seq) => {
            seq.iter().map(|element| element.encoded_len(mode)).sum()
        }
        Value::Set(ref set) => {
            set.iter().map(|element| element.encoded_len(mode)).sum()
        }
        Value::Tagged(ref tagged) => {
            if tagged.is_explicit() {
                tagged.inner().encoded_len(mode)
            }
            else {
                content_len(tagged.inner(), mode)
            }
        }
        Value::Unknown(ref val) => val.content().len(),
    }
}


//============ Tests =========================================================
