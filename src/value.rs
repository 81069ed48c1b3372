//! The tree of encodable values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::hash;
use std::slice;
use bytes::Bytes;
use crate::bstring::BitString;
use crate::decode::DecodeError;
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::ostring::OctetString;
use crate::string::{Ia5String, PrintableString, Utf8String};
use crate::tag::Tag;
use crate::time::{GeneralizedTime, UtcTime};


//------------ Value ---------------------------------------------------------

/// A single ASN.1 value.
///
/// This is the sum of all the types the crate knows how to encode and
/// decode: the typed primitive values, the two constructed containers, a
/// tagged wrapper, and an opaque fallback for everything else. Building a
/// tree of values and encoding it, or decoding data into such a tree, is
/// what this crate is about.
///
/// Values are immutable once constructed. Use [`SequenceBuilder`] and
/// [`SetBuilder`] to accumulate elements before sealing them into their
/// containers.
///
/// Equality and hashing are defined over the DER encoding: two values are
/// equal if and only if they encode to the same DER octets. In particular,
/// two sets with the same elements in different insertion orders are equal.
///
/// [`SequenceBuilder`]: struct.SequenceBuilder.html
/// [`SetBuilder`]: struct.SetBuilder.html
#[derive(Clone, Debug)]
pub enum Value {
    /// A BOOLEAN value.
    Boolean(bool),

    /// An INTEGER value.
    Integer(Integer),

    /// A BIT STRING value.
    BitString(BitString),

    /// An OCTET STRING value.
    OctetString(OctetString),

    /// A NULL value.
    Null,

    /// An OBJECT IDENTIFIER value.
    Oid(Oid),

    /// A UTF8String value.
    Utf8String(Utf8String),

    /// A PrintableString value.
    PrintableString(PrintableString),

    /// An IA5String value.
    Ia5String(Ia5String),

    /// A UTCTime value.
    UtcTime(UtcTime),

    /// A GeneralizedTime value.
    GeneralizedTime(GeneralizedTime),

    /// A SEQUENCE or SEQUENCE OF value.
    Sequence(Sequence),

    /// A SET or SET OF value.
    Set(Set),

    /// An explicitly or implicitly tagged value.
    Tagged(Box<Tagged>),

    /// A value of a type the crate doesn’t interpret.
    ///
    /// Unrecognized universal tags and primitive values of the other three
    /// classes decode into this variant, keeping the raw tag and content so
    /// the value re-encodes exactly.
    Unknown(Unknown),
}

impl Value {
    /// Decodes a single value from DER encoded data.
    ///
    /// This enables all strict validations. The data must contain exactly
    /// one encoded value.
    pub fn from_der(data: &[u8]) -> Result<Self, DecodeError> {
        Mode::Der.decode(data)
    }

    /// Decodes a single value from BER encoded data.
    pub fn from_ber(data: &[u8]) -> Result<Self, DecodeError> {
        Mode::Ber.decode(data)
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        match *self {
            Value::Boolean(_) => Tag::BOOLEAN,
            Value::Integer(_) => Tag::INTEGER,
            Value::BitString(_) => Tag::BIT_STRING,
            Value::OctetString(_) => Tag::OCTET_STRING,
            Value::Null => Tag::NULL,
            Value::Oid(_) => Tag::OID,
            Value::Utf8String(_) => Tag::UTF8_STRING,
            Value::PrintableString(_) => Tag::PRINTABLE_STRING,
            Value::Ia5String(_) => Tag::IA5_STRING,
            Value::UtcTime(_) => Tag::UTC_TIME,
            Value::GeneralizedTime(_) => Tag::GENERALIZED_TIME,
            Value::Sequence(_) => Tag::SEQUENCE,
            Value::Set(_) => Tag::SET,
            Value::Tagged(ref inner) => inner.tag(),
            Value::Unknown(ref inner) => inner.tag(),
        }
    }

    /// Returns the boolean if this is a BOOLEAN value.
    pub fn as_boolean(&self) -> Option<bool> {
        match *self {
            Value::Boolean(val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the integer if this is an INTEGER value.
    pub fn as_integer(&self) -> Option<&Integer> {
        match *self {
            Value::Integer(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the bit string if this is a BIT STRING value.
    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self {
            Value::BitString(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the octet string if this is an OCTET STRING.
    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match *self {
            Value::OctetString(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns whether this is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    /// Returns a reference to the identifier if this is an OBJECT
    /// IDENTIFIER value.
    pub fn as_oid(&self) -> Option<&Oid> {
        match *self {
            Value::Oid(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns the character string if this is any of the string values.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::Utf8String(ref val) => Some(val.as_str()),
            Value::PrintableString(ref val) => Some(val.as_str()),
            Value::Ia5String(ref val) => Some(val.as_str()),
            _ => None
        }
    }

    /// Returns a reference to the sequence if this is a SEQUENCE value.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match *self {
            Value::Sequence(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the set if this is a SET value.
    pub fn as_set(&self) -> Option<&Set> {
        match *self {
            Value::Set(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the tagged value if this is one.
    pub fn as_tagged(&self) -> Option<&Tagged> {
        match *self {
            Value::Tagged(ref val) => Some(val),
            _ => None
        }
    }

    /// Returns a reference to the opaque value if this is one.
    pub fn as_unknown(&self) -> Option<&Unknown> {
        match *self {
            Value::Unknown(ref val) => Some(val),
            _ => None
        }
    }
}


//--- PartialEq, Eq, and Hash
//
//  Equality of values is defined over their DER encoding.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.to_der() == other.to_der()
    }
}

impl Eq for Value { }

impl hash::Hash for Value {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write(self.to_der().as_ref())
    }
}


//--- From

macro_rules! from_impl {
    ( $( $type:ident => $variant:ident ),* ) => { $(
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Value::$variant(val)
            }
        }
    )* }
}

from_impl! {
    bool => Boolean,
    Integer => Integer,
    BitString => BitString,
    OctetString => OctetString,
    Oid => Oid,
    Utf8String => Utf8String,
    PrintableString => PrintableString,
    Ia5String => Ia5String,
    UtcTime => UtcTime,
    GeneralizedTime => GeneralizedTime,
    Sequence => Sequence,
    Set => Set,
    Unknown => Unknown
}

impl From<Tagged> for Value {
    fn from(val: Tagged) -> Self {
        Value::Tagged(Box::new(val))
    }
}


//------------ Sequence ------------------------------------------------------

/// A SEQUENCE value.
///
/// A sequence is an ordered collection of values. The order is semantically
/// significant and is preserved exactly as constructed or decoded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sequence {
    /// The elements of the sequence.
    elements: Vec<Value>,
}

impl Sequence {
    /// Returns the empty sequence.
    pub fn empty() -> Self {
        Sequence { elements: Vec::new() }
    }

    /// Returns a builder for a sequence.
    pub fn builder() -> SequenceBuilder {
        SequenceBuilder { elements: Vec::new() }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element at the given index, if present.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.elements.get(idx)
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> slice::Iter<Value> {
        self.elements.iter()
    }

    /// Returns the elements as a slice.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(elements: Vec<Value>) -> Self {
        Sequence { elements }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}


//------------ SequenceBuilder -----------------------------------------------

/// A builder accumulating the elements of a sequence.
///
/// Push elements in the order they should appear, then seal the builder
/// with [`finish`].
///
/// [`finish`]: #method.finish
#[derive(Clone, Debug, Default)]
pub struct SequenceBuilder {
    /// The elements pushed so far.
    elements: Vec<Value>,
}

impl SequenceBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the sequence being built.
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.elements.push(value.into());
        self
    }

    /// Seals the builder into an immutable sequence.
    pub fn finish(self) -> Sequence {
        Sequence { elements: self.elements }
    }
}


//------------ Set -----------------------------------------------------------

/// A SET value.
///
/// A set is a collection of values. The insertion order is kept and used
/// as-is by the BER encoder; the DER encoder reorders the elements into
/// ascending order of their encodings. Because equality of values is
/// defined over the DER encoding, two sets with the same elements in
/// different insertion orders compare equal.
#[derive(Clone, Debug, Default)]
pub struct Set {
    /// The elements of the set in insertion order.
    elements: Vec<Value>,
}

impl Set {
    /// Returns the empty set.
    pub fn empty() -> Self {
        Set { elements: Vec::new() }
    }

    /// Returns a builder for a set.
    pub fn builder() -> SetBuilder {
        SetBuilder { elements: Vec::new() }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element at the given index, if present.
    ///
    /// The index refers to the insertion order.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.elements.get(idx)
    }

    /// Returns an iterator over the elements in insertion order.
    pub fn iter(&self) -> slice::Iter<Value> {
        self.elements.iter()
    }

    /// Returns the elements as a slice in insertion order.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }
}

impl From<Vec<Value>> for Set {
    fn from(elements: Vec<Value>) -> Self {
        Set { elements }
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        let mut left: Vec<_> = self.iter().map(Value::to_der).collect();
        let mut right: Vec<_> = other.iter().map(Value::to_der).collect();
        left.sort();
        right.sort();
        left == right
    }
}

impl Eq for Set { }


//------------ SetBuilder ----------------------------------------------------

/// A builder accumulating the elements of a set.
#[derive(Clone, Debug, Default)]
pub struct SetBuilder {
    /// The elements pushed so far.
    elements: Vec<Value>,
}

impl SetBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the set being built.
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.elements.push(value.into());
        self
    }

    /// Seals the builder into an immutable set.
    pub fn finish(self) -> Set {
        Set { elements: self.elements }
    }
}


//------------ Tagged --------------------------------------------------------

/// A tagged value.
///
/// Tagging wraps a value under a tag of the application, context-specific,
/// or private class. With explicit tagging, the complete encoding of the
/// inner value – its own tag and length included – becomes the content of
/// the outer value. With implicit tagging, the inner value’s own tag is
/// replaced by the outer tag and its content octets are used as-is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tagged {
    /// The outer tag.
    tag: Tag,

    /// Whether the inner value is explicitly tagged.
    explicit: bool,

    /// The inner value.
    inner: Value,
}

impl Tagged {
    /// Creates an explicitly tagged value.
    ///
    /// The tag should not be of the universal class.
    pub fn explicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Tagged { tag, explicit: true, inner: inner.into() }
    }

    /// Creates an implicitly tagged value.
    ///
    /// The tag should not be of the universal class.
    pub fn implicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Tagged { tag, explicit: false, inner: inner.into() }
    }

    /// Returns the outer tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the inner value is explicitly tagged.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Returns a reference to the inner value.
    pub fn inner(&self) -> &Value {
        &self.inner
    }

    /// Converts the tagged value into its inner value.
    pub fn into_inner(self) -> Value {
        self.inner
    }
}


//------------ Unknown -------------------------------------------------------

/// A value of a type the crate doesn’t interpret.
///
/// The value keeps the raw tag, the constructed flag, and the raw content
/// octets so that it re-encodes to exactly the octets it was decoded from.
/// This is the forward compatibility fallback for unrecognized universal
/// tags, and the opaque representation for primitive values of the other
/// classes.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Unknown {
    /// The tag of the value.
    tag: Tag,

    /// Whether the value uses constructed encoding.
    constructed: bool,

    /// The raw content octets.
    content: Bytes,
}

impl Unknown {
    /// Creates a new opaque value.
    pub fn new(tag: Tag, constructed: bool, content: impl Into<Bytes>) -> Self {
        Unknown { tag, constructed, content: content.into() }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the raw content octets.
    pub fn content(&self) -> &[u8] {
        self.content.as_ref()
    }
}


//============ Tests =========================================================
