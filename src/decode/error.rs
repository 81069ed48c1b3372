//! Errors of the decoder.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::{error, fmt, ops};


//------------ ErrorKind -----------------------------------------------------

/// The classification of a decoding failure.
///
/// Every failure the decoder can produce falls into exactly one of these
/// kinds. The kind is what callers should match on when deciding whether a
/// failure is worth retrying in a more relaxed mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Fewer octets were available than a declared length requires.
    TruncatedInput,

    /// The identifier octets of a value were malformed or non-minimal.
    InvalidTagEncoding,

    /// The length octets of a value were malformed or non-minimal.
    InvalidLengthEncoding,

    /// The children of a constructed value don’t fill its declared length.
    ChildLengthMismatch,

    /// An indefinite length was encountered while decoding in DER mode.
    IndefiniteLengthNotAllowed,

    /// The elements of a DER SET were not in canonical order.
    UnsortedSetElements,

    /// An object identifier had illegal arc values or arc encoding.
    InvalidOid,

    /// The content octets of a primitive value violated its type’s rules.
    InvalidPrimitiveContent,

    /// The maximum depth of nested constructed values was exceeded.
    DepthLimitExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::TruncatedInput => "unexpected end of data",
            ErrorKind::InvalidTagEncoding => "invalid identifier octets",
            ErrorKind::InvalidLengthEncoding => "invalid length octets",
            ErrorKind::ChildLengthMismatch => {
                "content does not match declared length"
            }
            ErrorKind::IndefiniteLengthNotAllowed => {
                "indefinite length not allowed in DER"
            }
            ErrorKind::UnsortedSetElements => "SET elements not in DER order",
            ErrorKind::InvalidOid => "invalid object identifier",
            ErrorKind::InvalidPrimitiveContent => "invalid content octets",
            ErrorKind::DepthLimitExceeded => "nesting too deep",
        })
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error combines the [`ErrorKind`] it falls into with the position in
/// the input data it happened at and, optionally, some additional static
/// detail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// The kind of error.
    kind: ErrorKind,

    /// Additional static information, if available.
    msg: Option<&'static str>,

    /// The position in the source the error happened at.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error from a kind and a position.
    pub fn new(kind: ErrorKind, pos: Pos) -> Self {
        DecodeError { kind, msg: None, pos }
    }

    /// Creates a new error with an additional static message.
    pub fn with_msg(kind: ErrorKind, msg: &'static str, pos: Pos) -> Self {
        DecodeError { kind, msg: Some(msg), pos }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position in the input data the error happened at.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.msg {
            Some(msg) => {
                write!(f, "{} ({}) at position {}", self.kind, msg, self.pos)
            }
            None => write!(f, "{} at position {}", self.kind, self.pos),
        }
    }
}

impl error::Error for DecodeError { }


//------------ Pos -----------------------------------------------------------

/// The position within input data.
///
/// Values of this type are only meant for diagnostics. They cannot be used
/// to index back into the input, which is why this is a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
