//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object
//! identifiers, a construct used by ASN.1 to uniquely identify all sorts of
//! things. The type is also re-exported at the top level.
//!
//! [`Oid`]: struct.Oid.html

use std::{error, fmt, str};
use bytes::Bytes;
use smallvec::SmallVec;
use crate::decode::{DecodeError, ErrorKind, Pos};


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// Object identifiers are globally unique, hierarchical values that are
/// used to identify objects or their type. When written, they are presented
/// as a sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
/// The integers are called the _arcs_ of the identifier.
///
/// Values of this type keep the identifier in its encoded form, i.e., the
/// content octets of its BER encoding. The arcs are available through the
/// [`arcs`] method, the dotted notation through the `Display` and
/// `FromStr` impls.
///
/// # BER Encoding
///
/// The first two arcs are collapsed into a single subidentifier via
/// `arc0 * 40 + arc1`; because of this, the first arc must be 0, 1, or 2,
/// and if it is 0 or 1, the second arc must be at most 39. Each
/// subidentifier is then encoded in base 128, most significant digit first,
/// with bit 8 of each octet except the last set to 1 and no superfluous
/// leading `0x80` octet.
///
/// [`arcs`]: #method.arcs
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Oid(Bytes);

impl Oid {
    /// Creates an identifier from the content octets of a decoded value.
    ///
    /// Checks that the octets form a well-formed sequence of minimally
    /// encoded subidentifiers.
    pub fn from_content(
        content: Bytes, pos: Pos
    ) -> Result<Self, DecodeError> {
        if content.is_empty() {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidOid, "empty content", pos
            ))
        }
        let mut start = true;
        for &octet in content.iter() {
            if start && octet == 0x80 {
                return Err(DecodeError::with_msg(
                    ErrorKind::InvalidOid,
                    "superfluous leading octet in arc", pos
                ))
            }
            start = octet & 0x80 == 0;
        }
        if !start {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidOid,
                "last octet has continuation bit set", pos
            ))
        }
        Ok(Oid(content))
    }

    /// Creates an identifier from a sequence of arcs.
    ///
    /// There must be at least two arcs. The first arc must be 0, 1, or 2;
    /// if it is 0 or 1, the second arc must be at most 39.
    pub fn from_arcs(arcs: &[u32]) -> Result<Self, InvalidOid> {
        let (first, second) = match (arcs.first(), arcs.get(1)) {
            (Some(&first), Some(&second)) => (first, second),
            _ => return Err(InvalidOid(())),
        };
        if first > 2 || (first < 2 && second > 39) {
            return Err(InvalidOid(()))
        }
        let mut res = Vec::new();
        push_subident(
            u64::from(first) * 40 + u64::from(second), &mut res
        );
        for &arc in &arcs[2..] {
            push_subident(u64::from(arc), &mut res);
        }
        Ok(Oid(res.into()))
    }

    /// Returns the content octets of the identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns an iterator over the arcs of the identifier.
    pub fn arcs(&self) -> Iter {
        Iter::new(self.0.as_ref())
    }
}


//--- AsRef

impl AsRef<[u8]> for Oid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- FromStr

impl str::FromStr for Oid {
    type Err = InvalidOid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut arcs = SmallVec::<[u32; 12]>::new();
        for part in s.split('.') {
            arcs.push(part.parse().map_err(|_| InvalidOid(()))?);
        }
        Self::from_arcs(&arcs)
    }
}


//--- Display

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for arc in self.arcs() {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            match arc.to_u32() {
                Some(val) => write!(f, "{}", val)?,
                None => f.write_str("(oversized arc)")?,
            }
        }
        Ok(())
    }
}


/// Appends the base 128 encoding of a subidentifier to `target`.
fn push_subident(val: u64, target: &mut Vec<u8>) {
    let mut started = false;
    for shift in (1..=9).rev() {
        let digit = ((val >> (shift * 7)) & 0x7F) as u8;
        if digit != 0 || started {
            target.push(digit | 0x80);
            started = true;
        }
    }
    target.push((val & 0x7F) as u8);
}


//------------ Component -----------------------------------------------------

/// A single arc of an object identifier.
///
/// Although arcs are integers, they are encoded in a slightly inconvenient
/// way and are unbounded in size. Because of this we don’t convert them to
/// native integers when iterating but keep references to the underlying
/// octets. The [`to_u32`] method converts to a native integer where the
/// value fits.
///
/// [`to_u32`]: #method.to_u32
#[derive(Clone, Copy, Debug)]
pub struct Component<'a> {
    /// The position of the arc in the object identifier.
    position: Position,

    /// The octets of the subidentifier.
    slice: &'a [u8],
}

/// The position of an arc in the object identifier.
///
/// As the first two arcs of the identifier are collapsed into the first
/// subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// The first arc: 0 for subidentifier values 0..39, 1 for 40..79, and
    /// 2 for anything else.
    First,

    /// The second arc: the subidentifier value modulo 40 if it is below 80
    /// and the value minus 80 otherwise.
    Second,

    /// Any later arc: identical to the subidentifier value.
    Other,
}

impl<'a> Component<'a> {
    /// Creates a new component.
    fn new(slice: &'a [u8], position: Position) -> Self {
        Component { slice, position }
    }

    /// Attempts to convert the arc to a `u32`.
    ///
    /// Since the arc’s value can be larger than the maximum value of a
    /// `u32`, this may fail, in which case the method returns `None`.
    pub fn to_u32(self) -> Option<u32> {
        // This can be at most five octets with at most four bits in the
        // topmost octet.
        if self.slice.len() > 5
            || (self.slice.len() == 5 && self.slice[0] & 0x70 != 0)
        {
            return None
        }
        let mut res = 0;
        for &ch in self.slice {
            res = res << 7 | u32::from(ch & 0x7F);
        }
        match self.position {
            Position::First => {
                if res < 40 {
                    Some(0)
                }
                else if res < 80 {
                    Some(1)
                }
                else {
                    Some(2)
                }
            }
            Position::Second => {
                if res < 80 {
                    Some(res % 40)
                }
                else {
                    Some(res - 80)
                }
            }
            Position::Other => Some(res)
        }
    }
}


//--- PartialEq and Eq

impl<'a> PartialEq for Component<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.slice == other.slice
    }
}

impl<'a> Eq for Component<'a> { }


//------------ Iter ----------------------------------------------------------

/// An iterator over the arcs of an object identifier.
pub struct Iter<'a> {
    /// The remainder of the identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next arc.
    position: Position,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    fn new(slice: &'a [u8]) -> Self {
        Iter {
            slice,
            position: Position::First
        }
    }

    fn advance_position(&mut self) -> Position {
        let res = self.position;
        self.position = match res {
            Position::First => Position::Second,
            _ => Position::Other
        };
        res
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None
        }
        // Construction checks that the last octet has bit 8 cleared, so
        // there is always a terminating octet to find.
        let end = self.slice.iter().position(|&ch| ch & 0x80 == 0)?;
        let (res, tail) = self.slice.split_at(end + 1);
        let position = self.advance_position();
        // The first subidentifier encodes the first two arcs. Only move
        // past it when producing the second one.
        if position != Position::First {
            self.slice = tail;
        }
        Some(Component::new(res, position))
    }
}


//------------ InvalidOid ----------------------------------------------------

/// An object identifier with illegal arc values was provided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidOid(());

impl fmt::Display for InvalidOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid object identifier")
    }
}

impl error::Error for InvalidOid { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const RSA_ENCRYPTION: &[u8] =
        b"\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01";

    #[test]
    fn from_arcs() {
        let oid = Oid::from_arcs(
            &[1, 2, 840, 113549, 1, 1, 1]
        ).unwrap();
        assert_eq!(oid.as_slice(), RSA_ENCRYPTION);

        assert_eq!(
            Oid::from_arcs(&[2, 999, 3]).unwrap().as_slice(),
            b"\x88\x37\x03"
        );

        assert!(Oid::from_arcs(&[]).is_err());
        assert!(Oid::from_arcs(&[1]).is_err());
        assert!(Oid::from_arcs(&[3, 1]).is_err());
        assert!(Oid::from_arcs(&[0, 40]).is_err());
        assert!(Oid::from_arcs(&[1, 40]).is_err());
        assert!(Oid::from_arcs(&[2, 40]).is_ok());
    }

    #[test]
    fn from_str_and_display() {
        let oid: Oid = "1.2.840.113549.1.1.1".parse().unwrap();
        assert_eq!(oid.as_slice(), RSA_ENCRYPTION);
        assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");

        assert_eq!(
            "2.5.4.3".parse::<Oid>().unwrap().to_string(), "2.5.4.3"
        );
        assert!("".parse::<Oid>().is_err());
        assert!("1".parse::<Oid>().is_err());
        assert!("1.forty".parse::<Oid>().is_err());
        assert!("3.1".parse::<Oid>().is_err());
    }

    #[test]
    fn arcs() {
        let oid: Oid = "1.2.840.113549.1.1.1".parse().unwrap();
        let arcs: Vec<_> = oid.arcs().map(|c| c.to_u32().unwrap()).collect();
        assert_eq!(arcs, [1, 2, 840, 113549, 1, 1, 1]);

        let oid: Oid = "0.9.2342".parse().unwrap();
        let arcs: Vec<_> = oid.arcs().map(|c| c.to_u32().unwrap()).collect();
        assert_eq!(arcs, [0, 9, 2342]);
    }

    #[test]
    fn from_content() {
        let content = |data: &[u8]| Bytes::copy_from_slice(data);

        assert!(
            Oid::from_content(content(RSA_ENCRYPTION), 0.into()).is_ok()
        );
        // Empty content.
        assert_eq!(
            Oid::from_content(content(b""), 0.into()).unwrap_err().kind(),
            ErrorKind::InvalidOid
        );
        // Superfluous leading 0x80 in an arc.
        assert_eq!(
            Oid::from_content(
                content(b"\x2a\x80\x03"), 0.into()
            ).unwrap_err().kind(),
            ErrorKind::InvalidOid
        );
        // Last octet has the continuation bit set.
        assert_eq!(
            Oid::from_content(
                content(b"\x2a\x86"), 0.into()
            ).unwrap_err().kind(),
            ErrorKind::InvalidOid
        );
    }
}
