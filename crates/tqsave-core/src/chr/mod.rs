//! Character file (`.chr`) decoding.
//!
//! This module contains the byte-level decoder:
//! - `ByteCursor` - position-tracking reader over the file buffer
//! - `KeyRegistry` - key to record kind lookup (the implicit schema)
//! - `scan_key` - key token scanner
//! - value decoders for each record kind
//! - `decode` - recursive block parser producing the `Record` tree

mod cursor;
pub mod encoding;
mod parser;
mod record;
pub mod registry;
pub mod scanner;
pub mod value;

// Character file builder for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use cursor::ByteCursor;
pub use encoding::{decode_cp1252, decode_cp1252_char};
pub use parser::{Decoded, UnknownKey, decode, decode_file, decode_with_options};
pub use record::{Record, RecordKind, RecordValue, Walk};
pub use registry::{KEY_TYPES, KeyRegistry, Lookup};
pub use scanner::{ScannedKey, scan_key};
pub use value::DecodedValue;

#[doc(hidden)]
pub use mock::ChrFileBuilder;
