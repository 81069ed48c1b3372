//! UTCTime and GeneralizedTime values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt, str};
use bytes::Bytes;
use crate::decode::{DecodeError, ErrorKind, Pos};
use crate::mode::Mode;


//------------ UtcTime -------------------------------------------------------

/// A UTCTime value.
///
/// The value is kept as the character string from the content octets, i.e.,
/// `YYMMDDHHMM` optionally followed by seconds, terminated by `Z` for UTC
/// or a `+HHMM`/`-HHMM` offset.
///
/// DER restricts the encoding to the form with seconds and the `Z`
/// terminator. The restriction is checked when decoding in DER mode.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UtcTime(String);

impl UtcTime {
    /// Creates a time value from its string form.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTime> {
        let s = s.into();
        if check_utc(s.as_bytes(), false) {
            Ok(UtcTime(s))
        }
        else {
            Err(InvalidTime(()))
        }
    }

    /// Creates a time value from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, mode: Mode, pos: Pos
    ) -> Result<Self, DecodeError> {
        if !check_utc(content.as_ref(), mode.is_der()) {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "malformed UTCTime", pos
            ))
        }
        // Checked: the string is ASCII.
        Ok(UtcTime(
            unsafe { str::from_utf8_unchecked(content.as_ref()) }.into()
        ))
    }

    /// Returns the string form of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ GeneralizedTime -----------------------------------------------

/// A GeneralizedTime value.
///
/// The value is kept as the character string from the content octets:
/// `YYYYMMDDHH`, optionally extended with minutes, seconds, and fractional
/// seconds, followed by nothing for local time, `Z` for UTC, or a
/// `+HHMM`/`-HHMM` offset.
///
/// DER restricts the encoding to the form with seconds, a fraction without
/// trailing zeros if present, and the `Z` terminator. The restriction is
/// checked when decoding in DER mode.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GeneralizedTime(String);

impl GeneralizedTime {
    /// Creates a time value from its string form.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTime> {
        let s = s.into();
        if check_generalized(s.as_bytes(), false) {
            Ok(GeneralizedTime(s))
        }
        else {
            Err(InvalidTime(()))
        }
    }

    /// Creates a time value from the content octets of a decoded value.
    pub fn from_content(
        content: Bytes, mode: Mode, pos: Pos
    ) -> Result<Self, DecodeError> {
        if !check_generalized(content.as_ref(), mode.is_der()) {
            return Err(DecodeError::with_msg(
                ErrorKind::InvalidPrimitiveContent,
                "malformed GeneralizedTime", pos
            ))
        }
        // Checked: the string is ASCII.
        Ok(GeneralizedTime(
            unsafe { str::from_utf8_unchecked(content.as_ref()) }.into()
        ))
    }

    /// Returns the string form of the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ Checking helpers ----------------------------------------------

/// Checks a sequence of two-digit pairs against inclusive maximums.
///
/// The pairs are month, day, hour, minute, and second in that order; the
/// caller passes however many of those the string carries.
fn check_pairs(digits: &[u8], maxima: &[(u8, u8)]) -> bool {
    for (pair, &(min, max)) in digits.chunks(2).zip(maxima) {
        let val = (pair[0] - b'0') * 10 + (pair[1] - b'0');
        if val < min || val > max {
            return false
        }
    }
    true
}

/// Checks the `Z` or offset suffix of a time value.
///
/// An empty suffix is only acceptable for GeneralizedTime in BER mode,
/// which is the only caller passing `allow_empty`.
fn check_suffix(suffix: &[u8], strict: bool, allow_empty: bool) -> bool {
    match suffix {
        b"" => allow_empty && !strict,
        b"Z" => true,
        _ => {
            if strict || suffix.len() != 5 {
                return false
            }
            (suffix[0] == b'+' || suffix[0] == b'-')
                && suffix[1..].iter().all(u8::is_ascii_digit)
                && check_pairs(&suffix[1..], &[(0, 23), (0, 59)])
        }
    }
}

/// Checks the string form of a UTCTime value.
fn check_utc(s: &[u8], strict: bool) -> bool {
    let digits = s.iter().position(|c| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if digits != 10 && digits != 12 {
        return false
    }
    if strict && digits != 12 {
        return false
    }
    if !check_pairs(
        &s[2..digits], &[(1, 12), (1, 31), (0, 23), (0, 59), (0, 59)]
    ) {
        return false
    }
    check_suffix(&s[digits..], strict, false)
}

/// Checks the string form of a GeneralizedTime value.
fn check_generalized(s: &[u8], strict: bool) -> bool {
    let digits = s.iter().position(|c| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if digits != 10 && digits != 12 && digits != 14 {
        return false
    }
    if strict && digits != 14 {
        return false
    }
    if !check_pairs(
        &s[4..digits], &[(1, 12), (1, 31), (0, 23), (0, 59), (0, 59)]
    ) {
        return false
    }
    let mut rest = &s[digits..];
    if let Some(&sep) = rest.first() {
        if sep == b'.' || (sep == b',' && !strict) {
            let frac = rest[1..].iter().position(|c| !c.is_ascii_digit())
                .unwrap_or(rest.len() - 1);
            if frac == 0 {
                return false
            }
            if strict && rest[frac] == b'0' {
                return false
            }
            rest = &rest[1 + frac..];
        }
    }
    check_suffix(rest, strict, true)
}


//------------ InvalidTime ---------------------------------------------------

/// A malformed time string was provided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidTime(());

impl fmt::Display for InvalidTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid time value")
    }
}

impl error::Error for InvalidTime { }


//============ Tests =========================================================
