//! An OCTET STRING value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;


//------------ OctetString ---------------------------------------------------

/// An OCTET STRING value.
///
/// An octet string is a sequence of octets, i.e., a glorified `[u8]`. The
/// type wraps the raw content octets of the encoded string.
///
/// # BER Encoding
///
/// In the primitive form, the content octets are the string’s octets. BER
/// also allows breaking a string up into a constructed sequence of chunks;
/// that form carries no information the tree model could use, so this crate
/// only deals in the primitive form, which is also the only form DER
/// allows.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct OctetString(Bytes);

impl OctetString {
    /// Creates an octet string from the given content.
    pub fn new(content: impl Into<Bytes>) -> Self {
        OctetString(content.into())
    }

    /// Returns the octets of the string.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the number of octets in the string.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the string into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}


//--- AsRef and From

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<Bytes> for OctetString {
    fn from(bytes: Bytes) -> Self {
        OctetString(bytes)
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(vec: Vec<u8>) -> Self {
        OctetString(vec.into())
    }
}

impl From<&[u8]> for OctetString {
    fn from(slice: &[u8]) -> Self {
        OctetString(Bytes::copy_from_slice(slice))
    }
}
