//! Summary command: show who the save belongs to.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tqsave_core::{DecodeOptions, PlayerSave, decode_file, format_summary, summary_to_json};

/// Print the player summary of `file`
pub fn run(file: &Path, json: bool) -> Result<()> {
    let decoded = decode_file(file, &DecodeOptions::default())
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    let save = PlayerSave::from_record(&decoded.root);

    if json {
        println!("{}", summary_to_json(&save)?);
    } else {
        print!("{}", format_summary(&save, std::io::stdout().is_terminal()));
    }

    Ok(())
}
