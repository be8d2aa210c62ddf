//! Check command: validate a file and report dropped keys.

use std::path::Path;

use anyhow::{Result, bail};
use tqsave_core::{DecodeOptions, decode_file};

/// Decode `file` and report record counts and unknown keys
pub fn run(file: &Path) -> Result<()> {
    let current_version = env!("CARGO_PKG_VERSION");
    eprintln!("tqsave {} - Check Mode", current_version);
    eprintln!("Checking {}...", file.display());

    let decoded = match decode_file(file, &DecodeOptions::default()) {
        Ok(decoded) => decoded,
        Err(e) if e.is_format_error() => bail!("{}", e),
        Err(e) if e.is_truncated() => bail!("File is truncated or corrupt: {}", e),
        Err(e) => return Err(e.into()),
    };

    let root = &decoded.root;
    let blocks = root
        .walk()
        .filter(|(_, record)| record.is_block())
        .count();
    let unclosed = root
        .walk()
        .filter(|(_, record)| record.is_block() && !record.is_closed_block())
        .count();

    println!("Records:      {}", root.count());
    println!("Blocks:       {}", blocks);
    println!("Empty keys:   {}", decoded.empty_keys);
    println!("Unknown keys: {}", decoded.diagnostics.len());

    for unknown in &decoded.diagnostics {
        println!(
            "  {:>8}  depth {}  {}",
            unknown.position, unknown.depth, unknown.key
        );
    }

    if unclosed > 0 {
        eprintln!("Warning: {} blocks end without end_block", unclosed);
    }

    eprintln!("OK");
    Ok(())
}
