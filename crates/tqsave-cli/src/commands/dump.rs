//! Dump command: print the decoded record tree.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use tqsave_core::{DecodeOptions, TreeOptions, decode_file, format_tree, tree_to_json};

/// Decode `file` and print its records as an indented tree or JSON
pub fn run(
    file: &Path,
    json: bool,
    depth: Option<usize>,
    strict: bool,
    no_color: bool,
) -> Result<()> {
    let options = if strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    };

    debug!("Decode options: {:?}", options);

    let decoded = decode_file(file, &options)
        .with_context(|| format!("Failed to decode {}", file.display()))?;

    if json {
        println!("{}", tree_to_json(&decoded.root)?);
        return Ok(());
    }

    let tree_options = TreeOptions {
        max_depth: depth,
        color: !no_color && std::io::stdout().is_terminal(),
        ..TreeOptions::default()
    };
    print!("{}", format_tree(&decoded.root, &tree_options));

    if decoded.has_unknown_keys() {
        eprintln!(
            "{} unknown keys skipped (run `tqsave check` for details)",
            decoded.diagnostics.len()
        );
    }

    Ok(())
}
