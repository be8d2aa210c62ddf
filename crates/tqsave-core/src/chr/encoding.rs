//! Code page 1252 text decoding.
//!
//! Character files store text as single-byte Western European code page 1252.
//! Decoding is stateless, so these are plain functions over `encoding_rs`.

use encoding_rs::WINDOWS_1252;
use tracing::warn;

/// Decodes a single byte to its code page 1252 character.
pub fn decode_cp1252_char(byte: u8) -> char {
    if byte.is_ascii() {
        return byte as char;
    }

    let bytes = [byte];
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
    decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Decodes code page 1252 bytes to a `String`.
///
/// Unlike C-string helpers, embedded zero bytes are kept; callers strip them.
pub fn decode_cp1252(bytes: &[u8]) -> String {
    let (decoded, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    if had_errors {
        warn!(
            "Code page 1252 decoding had errors for bytes: {:?}",
            &bytes[..bytes.len().min(20)]
        );
    }
    decoded.into_owned()
}

/// Encodes text as code page 1252.
///
/// Unmappable characters become HTML decimal character references (`&#NNNN;`).
pub fn encode_cp1252(text: &str) -> Vec<u8> {
    let (encoded, _, _) = WINDOWS_1252.encode(text);
    encoded.into_owned()
}
