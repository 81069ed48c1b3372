//! Restricted character string values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt, str};
use bytes::Bytes;
use crate::decode::{DecodeError, ErrorKind, Pos};


//------------ Utf8String ----------------------------------------------------

/// A UTF8String value.
///
/// This character string allows all Unicode code points encoded in UTF-8.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Utf8String(String);

impl Utf8String {
    /// Creates a string value from a native string.
    pub fn new(s: impl Into<String>) -> Self {
        Utf8String(s.into())
    }

    /// Creates a string from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, pos: Pos
    ) -> Result<Self, DecodeError> {
        match String::from_utf8(content.to_vec()) {
            Ok(s) => Ok(Utf8String(s)),
            Err(_) => Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "invalid UTF-8 in UTF8String", pos
            ))
        }
    }

    /// Returns the string slice of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a native string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Utf8String {
    fn from(s: &str) -> Self {
        Utf8String(s.into())
    }
}

impl From<String> for Utf8String {
    fn from(s: String) -> Self {
        Utf8String(s)
    }
}

impl fmt::Display for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ PrintableString -----------------------------------------------

/// A PrintableString value.
///
/// This character string allows the following characters from the ASCII
/// character set and encodes them with their ASCII value:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character ` `,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct PrintableString(String);

/// Returns whether the octet is a printable string character.
fn is_printable(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || // A-Z a-z 0-9
    ch == b' ' || ch == b'\'' || ch == b'(' || ch == b')' ||
    ch == b'+' || ch == b',' || ch == b'-' || ch == b'.' ||
    ch == b'/' || ch == b':' || ch == b'=' || ch == b'?'
}

impl PrintableString {
    /// Creates a string value from a native string.
    ///
    /// Fails if the string contains characters outside the printable
    /// string character set.
    pub fn new(s: impl Into<String>) -> Result<Self, CharSetError> {
        let s = s.into();
        if s.bytes().all(is_printable) {
            Ok(PrintableString(s))
        }
        else {
            Err(CharSetError(()))
        }
    }

    /// Creates a string from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, pos: Pos
    ) -> Result<Self, DecodeError> {
        if !content.iter().copied().all(is_printable) {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "illegal character in PrintableString", pos
            ))
        }
        // Checked: printable characters are ASCII.
        Ok(PrintableString(
            unsafe { str::from_utf8_unchecked(content.as_ref()) }.into()
        ))
    }

    /// Returns the string slice of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a native string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl str::FromStr for PrintableString {
    type Err = CharSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for PrintableString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ Ia5String -----------------------------------------------------

/// An IA5String value.
///
/// This character string allows all ASCII characters, i.e., octets with
/// values `0x00` to `0x7F`, and encodes them with their ASCII value.
///
/// The type’s name is derived from the name used in ASN.1. IA5, the
/// International Alphabet No. 5, is the ITU name for ASCII.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ia5String(String);

impl Ia5String {
    /// Creates a string value from a native string.
    ///
    /// Fails if the string contains non-ASCII characters.
    pub fn new(s: impl Into<String>) -> Result<Self, CharSetError> {
        let s = s.into();
        if s.is_ascii() {
            Ok(Ia5String(s))
        }
        else {
            Err(CharSetError(()))
        }
    }

    /// Creates a string from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, pos: Pos
    ) -> Result<Self, DecodeError> {
        if !content.iter().copied().all(|ch| ch.is_ascii()) {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "illegal character in IA5String", pos
            ))
        }
        Ok(Ia5String(
            unsafe { str::from_utf8_unchecked(content.as_ref()) }.into()
        ))
    }

    /// Returns the string slice of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a native string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl str::FromStr for Ia5String {
    type Err = CharSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Ia5String {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ CharSetError --------------------------------------------------

/// A string contained characters outside its character set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharSetError(());

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("character outside character set")
    }
}

impl error::Error for CharSetError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn content(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn utf8() {
        assert_eq!(
            Utf8String::from_content(
                content("hëllo".as_bytes()), 0.into()
            ).unwrap().as_str(),
            "hëllo"
        );
        assert_eq!(
            Utf8String::from_content(
                content(b"\xff\xfe"), 0.into()
            ).unwrap_err().kind(),
            ErrorKind::InvalidPrimitiveContent
        );
    }

    #[test]
    fn printable() {
        assert!(PrintableString::new("Test User 1").is_ok());
        assert!(PrintableString::new("test1@rsa.com").is_err());
        assert!(PrintableString::new("under_score").is_err());
        assert!(
            PrintableString::from_content(
                content(b"O=Example, C=NL"), 0.into()
            ).is_ok()
        );
        assert!(
            PrintableString::from_content(
                content(b"nope*"), 0.into()
            ).is_err()
        );
    }

    #[test]
    fn ia5() {
        assert!(Ia5String::new("test1@rsa.com").is_ok());
        assert!(Ia5String::new("hëllo").is_err());
        assert!(
            Ia5String::from_content(content(b"\x7f"), 0.into()).is_ok()
        );
        assert!(
            Ia5String::from_content(content(b"\x80"), 0.into()).is_err()
        );
    }
}
