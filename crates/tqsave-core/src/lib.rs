//! # tqsave-core
//!
//! Decoder for character save files (`.chr`).
//!
//! This crate provides:
//! - A byte-level decoder producing a tree of typed records with byte offsets
//! - The key-type registry used to interpret values without in-file type tags
//! - A player summary projection over the decoded tree
//! - Console and JSON export of decoded trees

pub mod chr;
pub mod config;
pub mod error;
pub mod export;
pub mod save;

// Re-export from chr module
pub use chr::{
    ByteCursor, Decoded, KeyRegistry, Lookup, Record, RecordKind, RecordValue, UnknownKey,
    decode, decode_file, decode_with_options,
};

// Re-export from config module
pub use config::{DecodeOptions, UnknownKeyPolicy};

// Re-export from error module
pub use error::{Error, Result};

// Re-export from export module
pub use export::{TreeOptions, format_summary, format_tree, summary_to_json, tree_to_json};

// Re-export from save module
pub use save::PlayerSave;
