//! Handling of data in Basic Encoding Rules.
//!
//! This crate allows decoding and encoding of data encoded in ASN.1’s
//! _Basic Encoding Rules_ as defined in ITU recommendation X.690 as well as
//! their stricter companion _Distinguished Encoding Rules._
//!
//! Data is modelled as a tree of [`Value`]s: typed primitive values such as
//! [`Integer`] or [`Oid`] at the leaves and the constructed containers
//! [`Sequence`] and [`Set`] – plus tagged and opaque values – at the inner
//! nodes. Decoding turns a slice of encoded octets into such a tree,
//! encoding turns a tree back into octets. The [`Mode`] selects between the
//! permissive BER rules and the canonical DER rules for either direction.
//!
//! The most commonly used types are re-exported at the top level. Decoding
//! starts with [`Value::from_der`] or [`Value::from_ber`]; encoding with
//! [`Value::to_der`] or [`Value::to_ber`].
//!
//! ```
//! use derval::{Integer, Sequence, Value};
//!
//! let mut builder = Sequence::builder();
//! builder.push(Integer::from(42u8));
//! builder.push(true);
//! let value = Value::from(builder.finish());
//!
//! let encoded = value.to_der();
//! assert_eq!(encoded.as_ref(), b"\x30\x06\x02\x01\x2a\x01\x01\xff");
//! assert_eq!(Value::from_der(&encoded).unwrap(), value);
//! ```

pub use self::bstring::{BitString, InvalidBitString};
pub use self::decode::{DecodeError, ErrorKind, Pos};
pub use self::int::Integer;
pub use self::mode::Mode;
pub use self::oid::{InvalidOid, Oid};
pub use self::ostring::OctetString;
pub use self::string::{CharSetError, Ia5String, PrintableString, Utf8String};
pub use self::tag::{Class, Tag};
pub use self::time::{GeneralizedTime, InvalidTime, UtcTime};
pub use self::value::{
    Sequence, SequenceBuilder, Set, SetBuilder, Tagged, Unknown, Value
};

pub mod decode;
pub mod oid;

mod bstring;
mod encode;
mod int;
mod length;
mod mode;
mod ostring;
mod string;
mod tag;
mod time;
mod value;
