//! Decoder configuration.
//!
//! This module contains:
//! - `DecodeOptions` - caller-selected decoding behavior
//! - `UnknownKeyPolicy` - what to do with keys missing from the registry
//! - `format` - reserved bytes of the character file grammar

use serde::{Deserialize, Serialize};

/// Reserved bytes of the `.chr` byte grammar.
pub mod format {
    /// First byte of every character file.
    pub const FILE_MARKER: u8 = 0x0D;

    /// Unit byte of the 3-byte separator.
    pub const NULL: u8 = 0x00;

    /// Width of the zero separator.
    pub const SEPARATOR_LEN: usize = 3;

    /// Terminates a raw value.
    pub const RAW_DELIMITER: u8 = 0x0E;

    /// Terminates a page value.
    pub const PAGE_END: u8 = 0x0D;

    /// Bytes skipped before raw and block payloads.
    pub const RAW_PREFIX_LEN: usize = 4;

    /// Key scanner skips one extra byte when stopped by one of these.
    pub const BRACKET_CLOSE: char = '\u{29}';
    pub const TAB: char = '\u{09}';

    pub const UNDERSCORE: char = '_';

    /// Decoded characters in this range are accepted in keys.
    pub const CODE_PAGE_START: char = '\u{80}';
    pub const CODE_PAGE_END: char = '\u{FF}';

    pub const BEGIN_BLOCK: &str = "begin_block";
    pub const END_BLOCK: &str = "end_block";
}

/// Handling of keys that are not in the key registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownKeyPolicy {
    /// Drop the record without consuming value bytes and keep going.
    #[default]
    Skip,
    /// Abort decoding on the first non-empty unknown key.
    Reject,
}

/// Options for a single decode call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub unknown_keys: UnknownKeyPolicy,
    /// Record unknown keys in `Decoded::diagnostics`.
    pub collect_diagnostics: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeyPolicy::Skip,
            collect_diagnostics: true,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that fail on the first unknown key.
    pub fn strict() -> Self {
        Self::default().unknown_keys(UnknownKeyPolicy::Reject)
    }

    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn collect_diagnostics(mut self, enabled: bool) -> Self {
        self.collect_diagnostics = enabled;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.unknown_keys == UnknownKeyPolicy::Reject
    }
}
