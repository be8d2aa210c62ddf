//! Rendering of decoded files for display and export.

mod console;

pub use console::*;

use crate::chr::Record;
use crate::error::Result;
use crate::save::PlayerSave;

/// Serialize a decoded tree as pretty-printed JSON.
pub fn tree_to_json(root: &Record) -> Result<String> {
    Ok(serde_json::to_string_pretty(root)?)
}

/// Serialize a player summary as pretty-printed JSON.
pub fn summary_to_json(save: &PlayerSave) -> Result<String> {
    Ok(serde_json::to_string_pretty(save)?)
}
