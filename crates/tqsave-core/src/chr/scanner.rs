//! Key token scanner.
//!
//! Keys are located by scanning forward to the next zero separator and then
//! reading "bare text" (alphanumerics, underscore and extended code page
//! characters) from just after it.

use tracing::trace;

use crate::chr::cursor::ByteCursor;
use crate::config::format::{
    BEGIN_BLOCK, BRACKET_CLOSE, CODE_PAGE_END, CODE_PAGE_START, END_BLOCK, SEPARATOR_LEN, TAB,
    UNDERSCORE,
};
use crate::error::{Error, Result};

/// A key read from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedKey {
    pub text: String,
    /// Position the scan started from.
    pub scan_start: usize,
    pub key_start: usize,
    pub key_end: usize,
}

impl ScannedKey {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Characters accepted in bare text.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == UNDERSCORE || (CODE_PAGE_START..=CODE_PAGE_END).contains(&c)
}

/// Reads the next key, leaving the cursor at the first byte after it.
///
/// # Errors
///
/// Returns `Error::OutOfRange` if no separator is left in the buffer, or if the
/// key text runs into the end of the buffer.
pub fn scan_key(cursor: &mut ByteCursor<'_>) -> Result<ScannedKey> {
    let scan_start = cursor.position();

    while !cursor.at_separator(0) {
        if cursor.remaining() <= SEPARATOR_LEN {
            return Err(Error::OutOfRange {
                position: cursor.position(),
                wanted: SEPARATOR_LEN,
                len: cursor.len(),
            });
        }
        cursor.advance(1)?;
    }
    cursor.advance(SEPARATOR_LEN)?;

    let key_start = cursor.position();
    let mut text = String::new();
    let mut current = cursor.peek_char(0)?;

    while !cursor.at_separator(0) && is_key_char(current) {
        text.push(current);
        cursor.advance(1)?;

        // Block markers end the key even if more key characters follow
        if text == BEGIN_BLOCK || text == END_BLOCK {
            break;
        }

        current = cursor.peek_char(0)?;
    }
    let key_end = cursor.position();

    if current == BRACKET_CLOSE || current == TAB {
        cursor.advance(1)?;
    }

    trace!("Scanned key {:?} at {}..{}", text, key_start, key_end);

    Ok(ScannedKey {
        text,
        scan_start,
        key_start,
        key_end,
    })
}
