//! Position-tracking cursor over a character file buffer.
//!
//! `ByteCursor` wraps the whole file as a byte slice and keeps the single read
//! position shared by the key scanner and the value decoder. Every read or skip
//! past the end of the buffer fails with `Error::OutOfRange`.

use crate::chr::encoding::decode_cp1252_char;
use crate::config::format::{NULL, SEPARATOR_LEN};
use crate::error::{Error, Result};

/// A position-tracking reader over an immutable byte buffer.
///
/// # Example
///
/// ```
/// use tqsave_core::chr::ByteCursor;
///
/// let data = [0x0D, 0x00, 0x00, 0x00, b'x'];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.peek(0).unwrap(), 0x0D);
/// cursor.advance(1).unwrap();
/// assert!(cursor.at_separator(0));
/// assert_eq!(cursor.position(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// True once fewer than 2 bytes remain.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() < 2
    }

    /// True when the position has reached the end of the buffer.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the byte at `position + offset` without advancing.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if the byte lies beyond the buffer.
    pub fn peek(&self, offset: usize) -> Result<u8> {
        let wanted = offset.saturating_add(1);
        let index = self
            .pos
            .checked_add(offset)
            .ok_or_else(|| self.out_of_range(wanted))?;
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(wanted))
    }

    /// Returns the byte at `position + offset` decoded as a code page 1252 character.
    pub fn peek_char(&self, offset: usize) -> Result<char> {
        self.peek(offset).map(decode_cp1252_char)
    }

    /// Moves the position forward by `count` bytes.
    ///
    /// Advancing exactly to the end of the buffer is allowed.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if the new position would exceed the buffer.
    pub fn advance(&mut self, count: usize) -> Result<()> {
        let end = self.pos.checked_add(count).ok_or_else(|| self.out_of_range(count))?;
        if end > self.data.len() {
            return Err(self.out_of_range(count));
        }
        self.pos = end;
        Ok(())
    }

    /// Moves the position back by `count` bytes.
    pub fn retreat(&mut self, count: usize) -> Result<()> {
        self.pos = self.pos.checked_sub(count).ok_or(Error::OutOfRange {
            position: self.pos,
            wanted: count,
            len: self.data.len(),
        })?;
        Ok(())
    }

    /// Reads one byte and advances past it.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek(0)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reports whether a 3-byte zero separator begins at `position + offset`.
    ///
    /// A separator that would extend past the buffer end does not match.
    pub fn at_separator(&self, offset: usize) -> bool {
        let Some(start) = self.pos.checked_add(offset) else {
            return false;
        };
        match self.data.get(start..start + SEPARATOR_LEN) {
            Some(window) => window.iter().all(|&b| b == NULL),
            None => false,
        }
    }

    /// Skips a separator at the current position if one is present.
    ///
    /// Returns whether a separator was skipped.
    pub fn skip_separator(&mut self) -> bool {
        if self.at_separator(0) {
            self.pos += SEPARATOR_LEN;
            true
        } else {
            false
        }
    }

    /// Returns the bytes in `start..end` of the underlying buffer.
    pub fn slice(&self, start: usize, end: usize) -> Result<&'a [u8]> {
        if start > end || end > self.data.len() {
            return Err(Error::OutOfRange {
                position: start,
                wanted: end.saturating_sub(start),
                len: self.data.len(),
            });
        }
        Ok(&self.data[start..end])
    }

    fn out_of_range(&self, wanted: usize) -> Error {
        Error::OutOfRange {
            position: self.pos,
            wanted,
            len: self.data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let cursor = ByteCursor::new(&data);

        assert_eq!(cursor.peek(0).unwrap(), 0x01);
        assert_eq!(cursor.peek(2).unwrap(), 0x03);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_peek_past_end_is_out_of_range() {
        let data = [0x01, 0x02];
        let cursor = ByteCursor::new(&data);

        let err = cursor.peek(2).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_peek_huge_offset_is_out_of_range() {
        let data = [0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.peek(usize::MAX).unwrap_err().is_truncated());

        cursor.advance(1).unwrap();
        match cursor.peek(usize::MAX).unwrap_err() {
            Error::OutOfRange { wanted, .. } => assert_eq!(wanted, usize::MAX),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_advance_to_end_allowed() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut cursor = ByteCursor::new(&data);

        cursor.advance(4).unwrap();
        assert_eq!(cursor.position(), 4);
        assert!(cursor.is_at_end());
        assert!(cursor.advance(1).is_err());
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_retreat() {
        let data = [0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);

        assert!(cursor.retreat(1).is_err());
        cursor.advance(2).unwrap();
        cursor.retreat(1).unwrap();
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_at_separator() {
        let data = [0x05, 0x00, 0x00, 0x00, 0x00];
        let cursor = ByteCursor::new(&data);

        assert!(!cursor.at_separator(0));
        assert!(cursor.at_separator(1));
        assert!(cursor.at_separator(2));
        // Only two bytes left from offset 3
        assert!(!cursor.at_separator(3));
    }

    #[test]
    fn test_skip_separator() {
        let data = [0x00, 0x00, 0x00, 0x07];
        let mut cursor = ByteCursor::new(&data);

        assert!(cursor.skip_separator());
        assert_eq!(cursor.position(), 3);
        assert!(!cursor.skip_separator());
        assert_eq!(cursor.read_u8().unwrap(), 0x07);
    }

    #[test]
    fn test_exhausted() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&data);

        assert!(!cursor.is_exhausted());
        cursor.advance(1).unwrap();
        assert!(!cursor.is_exhausted());
        cursor.advance(1).unwrap();
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_peek_char_uses_code_page() {
        let data = [0xE9];
        let cursor = ByteCursor::new(&data);
        assert_eq!(cursor.peek_char(0).unwrap(), 'é');
    }

    #[test]
    fn test_slice_bounds() {
        let data = [0x01, 0x02, 0x03];
        let cursor = ByteCursor::new(&data);

        assert_eq!(cursor.slice(1, 3).unwrap(), &[0x02, 0x03]);
        assert!(cursor.slice(2, 4).is_err());
    }
}
