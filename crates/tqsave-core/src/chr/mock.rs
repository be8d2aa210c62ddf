//! Character file builder for testing
//!
//! Provides a fluent API for constructing `.chr` byte layouts the way the game
//! writes them: keys and text are prefixed with a 4-byte little-endian length,
//! integers and booleans are 4-byte little-endian values.

use crate::chr::encoding::encode_cp1252;
use crate::config::format::{BEGIN_BLOCK, END_BLOCK};

/// Header bytes written after `begin_block`.
pub const BLOCK_HEADER: [u8; 4] = [0xCE, 0xFA, 0x1D, 0xB0];

/// Trailer bytes written after `end_block`.
pub const BLOCK_TRAILER: [u8; 4] = [0xDE, 0xC0, 0xAD, 0xDE];

/// Builder for character file buffers
#[derive(Debug, Clone, Default)]
pub struct ChrFileBuilder {
    data: Vec<u8>,
}

impl ChrFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length of the buffer, i.e. the offset of the next write
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a length-prefixed key
    pub fn key(mut self, key: &str) -> Self {
        self.push_prefixed(&encode_cp1252(key));
        self
    }

    /// Write a key followed by a 4-byte integer value
    pub fn int(self, key: &str, value: u32) -> Self {
        self.key(key).u32(value)
    }

    /// Write a key followed by a 4-byte boolean value
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.key(key).u32(u32::from(value))
    }

    /// Write a key followed by length-prefixed code page 1252 text
    pub fn string(mut self, key: &str, text: &str) -> Self {
        self = self.key(key);
        self.push_prefixed(&encode_cp1252(text));
        self
    }

    /// Write a key followed by length-prefixed UTF-16LE text (length in characters)
    pub fn wide_string(mut self, key: &str, text: &str) -> Self {
        self = self.key(key);
        let units: Vec<u16> = text.encode_utf16().collect();
        self.data
            .extend_from_slice(&(units.len() as u32).to_le_bytes());
        for unit in units {
            self.data.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }

    /// Write a key followed by raw identifier bytes
    pub fn id(self, key: &str, bytes: &[u8]) -> Self {
        self.key(key).bytes(bytes)
    }

    /// Write a key followed by a length-prefixed raw value
    pub fn raw(mut self, key: &str, bytes: &[u8]) -> Self {
        self = self.key(key);
        self.push_prefixed(bytes);
        self
    }

    /// Write a key followed by a 4-byte page value
    pub fn page(self, key: &str, value: u32) -> Self {
        self.key(key).u32(value)
    }

    pub fn begin_block(self) -> Self {
        self.key(BEGIN_BLOCK).bytes(&BLOCK_HEADER)
    }

    pub fn end_block(self) -> Self {
        self.key(END_BLOCK).bytes(&BLOCK_TRAILER)
    }

    /// Write a little-endian 32-bit value
    pub fn u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write raw bytes
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    fn push_prefixed(&mut self, bytes: &[u8]) {
        self.data
            .extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.data.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_int() {
        let data = ChrFileBuilder::new().int("headerVersion", 2).build();

        assert_eq!(&data[..4], &[0x0D, 0x00, 0x00, 0x00]);
        assert_eq!(&data[4..17], b"headerVersion");
        assert_eq!(&data[17..], &[0x02, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_builder_wide_string() {
        let data = ChrFileBuilder::new().wide_string("myPlayerName", "Io").build();

        assert_eq!(&data[16..20], &[0x02, 0x00, 0x00, 0x00]);
        assert_eq!(&data[20..], &[b'I', 0x00, b'o', 0x00]);
    }

    #[test]
    fn test_builder_blocks() {
        let data = ChrFileBuilder::new().begin_block().end_block().build();

        assert_eq!(data[0], 0x0B);
        assert_eq!(&data[4..15], b"begin_block");
        assert_eq!(&data[15..19], &BLOCK_HEADER);
        assert_eq!(data[19], 0x09);
        assert_eq!(&data[23..32], b"end_block");
        assert_eq!(&data[32..], &BLOCK_TRAILER);
    }

    #[test]
    fn test_builder_len_tracks_offset() {
        let builder = ChrFileBuilder::new().key("money");
        assert_eq!(builder.len(), 9);
        assert!(!builder.is_empty());
    }
}
