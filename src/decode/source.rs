//! The source of data for decoding.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use super::error::{DecodeError, ErrorKind, Pos};


//------------ SliceSource ---------------------------------------------------

/// A source of data atop a bytes slice.
///
/// The source keeps track of the position in the overall input for error
/// reporting and of an optional _limit,_ the number of octets left in the
/// span of the constructed value currently being decoded. While a limit is
/// set, requesting data beyond it is a [`ChildLengthMismatch`] rather than
/// truncated input: the octets may well exist, they just belong to the
/// enclosing value.
///
/// [`ChildLengthMismatch`]: enum.ErrorKind.html#variant.ChildLengthMismatch
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a> {
    /// The data not yet consumed.
    data: &'a [u8],

    /// The position of the start of `data` in the overall input.
    pos: usize,

    /// The number of octets left in the current parent span, if limited.
    limit: Option<usize>,
}

impl<'a> SliceSource<'a> {
    /// Creates a new source atop the given data.
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0, limit: None }
    }

    /// Returns the current position in the overall input.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the current limit.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Replaces the limit, returning the previous one.
    ///
    /// The caller is responsible for only ever shrinking the span and for
    /// restoring the previous limit when the inner span is done.
    pub fn set_limit(&mut self, limit: Option<usize>) -> Option<usize> {
        std::mem::replace(&mut self.limit, limit)
    }

    /// Returns the number of octets that may still be taken.
    pub fn remaining(&self) -> usize {
        match self.limit {
            Some(limit) => std::cmp::min(limit, self.data.len()),
            None => self.data.len(),
        }
    }

    /// Returns the next octet without consuming it.
    pub fn peek(&self) -> Option<u8> {
        if self.limit == Some(0) {
            return None
        }
        self.data.first().copied()
    }

    /// Returns the octet at the given index without consuming anything.
    pub fn peek_nth(&self, n: usize) -> Option<u8> {
        if let Some(limit) = self.limit {
            if n >= limit {
                return None
            }
        }
        self.data.get(n).copied()
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.take_slice(1).map(|slice| slice[0])
    }

    /// Takes a slice of the given length from the source.
    pub fn take_slice(
        &mut self, len: usize
    ) -> Result<&'a [u8], DecodeError> {
        if self.data.len() < len {
            return Err(self.err(ErrorKind::TruncatedInput))
        }
        if let Some(limit) = self.limit {
            if limit < len {
                return Err(self.err(ErrorKind::ChildLengthMismatch))
            }
            self.limit = Some(limit - len);
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        self.pos += len;
        Ok(head)
    }

    /// Returns an error of the given kind at the current position.
    pub fn err(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos())
    }

    /// Returns an error with a static message at the current position.
    pub fn err_msg(
        &self, kind: ErrorKind, msg: &'static str
    ) -> DecodeError {
        DecodeError::with_msg(kind, msg, self.pos())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn take_and_pos() {
        let mut source = SliceSource::new(b"\x01\x02\x03");
        assert_eq!(source.take_u8().unwrap(), 1);
        assert_eq!(source.take_slice(2).unwrap(), b"\x02\x03");
        assert_eq!(source.remaining(), 0);
        let err = source.take_u8().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.pos(), 3.into());
    }

    #[test]
    fn limit_vs_truncation() {
        // Data present beyond the limit: a child length mismatch.
        let mut source = SliceSource::new(b"\x01\x02\x03\x04");
        source.set_limit(Some(2));
        assert_eq!(source.remaining(), 2);
        assert_eq!(
            source.take_slice(3).unwrap_err().kind(),
            ErrorKind::ChildLengthMismatch
        );

        // Data missing entirely: truncated input.
        let mut source = SliceSource::new(b"\x01\x02");
        source.set_limit(Some(7));
        assert_eq!(
            source.take_slice(3).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn peek_respects_limit() {
        let mut source = SliceSource::new(b"\x01\x02");
        source.set_limit(Some(1));
        assert_eq!(source.peek(), Some(1));
        assert_eq!(source.peek_nth(1), None);
        source.take_u8().unwrap();
        assert_eq!(source.peek(), None);
    }
}
