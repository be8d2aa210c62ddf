//! Type-directed value decoding.
//!
//! Each record kind has its own byte encoding. The decoders here consume the
//! bytes following a key and report the span of the payload they read.

use crate::chr::cursor::ByteCursor;
use crate::chr::encoding::decode_cp1252;
use crate::chr::record::{RecordKind, RecordValue};
use crate::config::format::{PAGE_END, RAW_DELIMITER, RAW_PREFIX_LEN, SEPARATOR_LEN};
use crate::error::Result;

/// A decoded payload and its half-open byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedValue {
    pub value: RecordValue,
    pub start: usize,
    pub end: usize,
}

impl DecodedValue {
    fn new(value: RecordValue, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }
}

/// Decodes the value of a non-block record.
///
/// `key_end` is where the key text ended; page values re-read a quirk byte the
/// scanner skipped past it. `BlockStart` is decoded by the block parser, which
/// uses [`read_block_header`] and then collects children.
pub fn decode_value(
    cursor: &mut ByteCursor<'_>,
    kind: RecordKind,
    key_end: usize,
) -> Result<DecodedValue> {
    match kind {
        RecordKind::Integer => read_integer(cursor),
        RecordKind::Boolean => read_boolean(cursor),
        RecordKind::Text => read_text(cursor),
        RecordKind::Identifier => read_identifier(cursor),
        RecordKind::RawBytes | RecordKind::BlockEnd | RecordKind::BlockStart => {
            read_prefixed_raw(cursor)
        }
        RecordKind::Page => read_page(cursor, key_end),
        RecordKind::File | RecordKind::Unknown => {
            let pos = cursor.position();
            Ok(DecodedValue::new(RecordValue::None, pos, pos))
        }
    }
}

/// Reads a one-byte integer, skipping a leading separator if present.
pub fn read_integer(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    cursor.skip_separator();
    let start = cursor.position();
    let value = cursor.read_u8()?;
    Ok(DecodedValue::new(
        RecordValue::Integer(value),
        start,
        cursor.position(),
    ))
}

/// Reads a one-byte boolean, skipping a leading separator if present.
pub fn read_boolean(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    cursor.skip_separator();
    let start = cursor.position();
    let value = cursor.read_u8()? != 0;
    Ok(DecodedValue::new(
        RecordValue::Boolean(value),
        start,
        cursor.position(),
    ))
}

/// Reads length-prefixed text.
///
/// The declared length counts non-zero characters only: every embedded zero
/// byte is skipped and extends the field by one.
pub fn read_text(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    let declared = match read_integer(cursor)?.value {
        RecordValue::Integer(len) => usize::from(len),
        _ => 0,
    };
    cursor.advance(SEPARATOR_LEN)?;

    let start = cursor.position();
    let mut limit = start + declared;
    let mut bytes = Vec::with_capacity(declared);

    while cursor.position() < limit {
        let byte = cursor.read_u8()?;
        if byte == 0 {
            limit += 1;
            continue;
        }
        bytes.push(byte);
    }

    Ok(DecodedValue::new(
        RecordValue::Text(decode_cp1252(&bytes)),
        start,
        cursor.position(),
    ))
}

/// Reads arbitrary bytes as text up to the next separator or the buffer end.
pub fn read_identifier(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    let start = cursor.position();
    while !cursor.is_at_end() && !cursor.at_separator(0) {
        cursor.advance(1)?;
    }
    let end = cursor.position();
    let text = decode_cp1252(cursor.slice(start, end)?);
    Ok(DecodedValue::new(RecordValue::Text(text), start, end))
}

/// Reads bytes up to a raw delimiter, a separator or the buffer end.
///
/// The terminator is not consumed.
pub fn read_raw(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    let start = cursor.position();
    while !cursor.is_at_end() && cursor.peek(0)? != RAW_DELIMITER && !cursor.at_separator(0) {
        cursor.advance(1)?;
    }
    let end = cursor.position();
    let bytes = cursor.slice(start, end)?.to_vec();
    Ok(DecodedValue::new(RecordValue::Bytes(bytes), start, end))
}

/// Skips the 4-byte prefix and reads a raw value.
pub fn read_prefixed_raw(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    cursor.advance(RAW_PREFIX_LEN)?;
    read_raw(cursor)
}

/// Reads the header value that follows a `begin_block` key.
pub fn read_block_header(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    read_prefixed_raw(cursor)
}

/// Reads a page value: bytes up to the page terminator, which is then skipped.
///
/// When the key scanner skipped a quirk byte after the key, that byte belongs
/// to the page and is re-read. Otherwise the value starts at `key_end`: the
/// game's reader always stepped back one byte, which pulled the key's last
/// character into the value. Stepping back only over a skipped quirk byte
/// keeps the key and value spans disjoint.
pub fn read_page(cursor: &mut ByteCursor<'_>, key_end: usize) -> Result<DecodedValue> {
    if cursor.position() > key_end {
        cursor.retreat(1)?;
    }

    let start = cursor.position();
    while !cursor.is_at_end() && cursor.peek(0)? != PAGE_END {
        cursor.advance(1)?;
    }
    let end = cursor.position();
    let bytes = cursor.slice(start, end)?.to_vec();

    if !cursor.is_at_end() {
        cursor.advance(1)?;
    }

    Ok(DecodedValue::new(RecordValue::Bytes(bytes), start, end))
}
