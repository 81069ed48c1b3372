//! The encoding rules to apply.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{self, DecodeError};
use crate::value::Value;


//------------ Mode ----------------------------------------------------------

/// The encoding rules used for decoding or encoding.
///
/// X.690 defines a family of encoding rules. The Basic Encoding Rules allow
/// alternative encodings for some types as well as indefinite length
/// values. The Distinguished Encoding Rules are a subset of BER that allows
/// exactly one encoding for every value; they always employ definite length
/// form and the shortest possible encoding, and add restrictions for
/// certain types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    Ber,

    /// Distinguished Encoding Rules.
    Der,
}

impl Mode {
    /// Returns whether the mode is DER.
    pub fn is_der(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Decodes a single value from the given data in this mode.
    ///
    /// The data must contain exactly one encoded value. Trailing octets are
    /// an error.
    pub fn decode(self, data: &[u8]) -> Result<Value, DecodeError> {
        decode::decode(data, self)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ber
    }
}
