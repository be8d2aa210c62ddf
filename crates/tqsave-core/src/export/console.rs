//! Console output formatting with optional colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::chr::{Record, RecordKind, RecordValue};
use crate::save::PlayerSave;

/// Longest byte payload shown in full before truncation.
const MAX_PREVIEW_BYTES: usize = 32;

/// Options for [`format_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    /// Deepest nesting level printed (direct children of the root are depth 1).
    pub max_depth: Option<usize>,
    pub show_offsets: bool,
    pub color: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_offsets: true,
            color: false,
        }
    }
}

/// Format a decoded tree as an indented listing, one line per record.
pub fn format_tree(root: &Record, options: &TreeOptions) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} ({} bytes, {} records)",
        paint_kind(root.kind, options.color),
        root.length(),
        root.count()
    );

    for (depth, record) in root.walk() {
        if options.max_depth.is_some_and(|max| depth > max) {
            continue;
        }

        let indent = "  ".repeat(depth);
        let _ = write!(
            output,
            "{}{} [{}]",
            indent,
            record.key,
            paint_kind(record.kind, options.color)
        );

        let preview = format_value(&record.value);
        if !preview.is_empty() {
            let _ = write!(output, " = {}", preview);
        }

        if options.show_offsets {
            let offsets = format!(
                "@{}..{} key {}..{} value {}..{}",
                record.start,
                record.end,
                record.key_start,
                record.key_end,
                record.value_start,
                record.value_end
            );
            if options.color {
                let _ = write!(output, "  {}", offsets.dimmed());
            } else {
                let _ = write!(output, "  {}", offsets);
            }
        }

        output.push('\n');
    }

    output
}

/// Short human-readable rendering of a record value.
pub fn format_value(value: &RecordValue) -> String {
    match value {
        RecordValue::None => String::new(),
        RecordValue::Integer(v) => v.to_string(),
        RecordValue::Boolean(v) => v.to_string(),
        RecordValue::Text(text) => format!("{:?}", text),
        RecordValue::Bytes(bytes) => format_bytes(bytes),
    }
}

/// Printable ASCII payloads are shown as text, anything else as hex.
fn format_bytes(bytes: &[u8]) -> String {
    if !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return format!("{:?}", String::from_utf8_lossy(bytes));
    }

    let shown = &bytes[..bytes.len().min(MAX_PREVIEW_BYTES)];
    let mut hex = shown
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    if bytes.len() > MAX_PREVIEW_BYTES {
        let _ = write!(hex, " … ({} bytes)", bytes.len());
    }
    format!("[{}]", hex)
}

fn paint_kind(kind: RecordKind, color: bool) -> String {
    let name = kind.as_str();
    if !color {
        return name.to_string();
    }

    match kind {
        RecordKind::File | RecordKind::BlockStart | RecordKind::BlockEnd => {
            name.cyan().to_string()
        }
        RecordKind::Integer | RecordKind::Boolean => name.yellow().to_string(),
        RecordKind::Text | RecordKind::Identifier => name.green().to_string(),
        RecordKind::RawBytes | RecordKind::Page => name.magenta().to_string(),
        RecordKind::Unknown => name.red().to_string(),
    }
}

/// Format a player summary as a boxed block.
pub fn format_summary(save: &PlayerSave, color: bool) -> String {
    let mut output = String::new();

    let title = if save.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        save.name.clone()
    };
    let border = "━".repeat(title.chars().count().max(40));

    if color {
        let _ = writeln!(output, "{}", border.dimmed());
        let _ = writeln!(output, "  {}", title.bold());
        let _ = writeln!(output, "{}", border.dimmed());
    } else {
        let _ = writeln!(output, "{}", border);
        let _ = writeln!(output, "  {}", title);
        let _ = writeln!(output, "{}", border);
    }

    let quest = if save.is_in_main_quest { "yes" } else { "no" };
    let _ = writeln!(output, "  Class:       {}", save.class);
    let _ = writeln!(output, "  Level:       {}", save.level);
    let _ = writeln!(output, "  Main quest:  {}", quest);
    let _ = writeln!(output, "  Id:          {}", save.id_hex());

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Record {
        let mut level = Record::root(0);
        level.key = "playerLevel".to_string();
        level.kind = RecordKind::Integer;
        level.value = RecordValue::Integer(7);
        level.start = 1;
        level.key_start = 4;
        level.key_end = 15;
        level.value_start = 15;
        level.value_end = 16;
        level.end = 16;

        let mut block = Record::root(0);
        block.key = "begin_block".to_string();
        block.kind = RecordKind::BlockStart;
        block.value = RecordValue::Bytes(vec![0x0B]);
        block.children.push(level);

        let mut root = Record::root(64);
        root.children.push(block);
        root
    }

    #[test]
    fn test_format_tree_plain() {
        let options = TreeOptions {
            show_offsets: false,
            ..Default::default()
        };
        let output = format_tree(&sample_tree(), &options);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "File (64 bytes, 2 records)");
        assert_eq!(lines[1], "  begin_block [BlockStart] = [0B]");
        assert_eq!(lines[2], "    playerLevel [Integer] = 7");
    }

    #[test]
    fn test_format_tree_offsets() {
        let output = format_tree(&sample_tree(), &TreeOptions::default());
        assert!(output.contains("playerLevel [Integer] = 7  @1..16 key 4..15 value 15..16"));
    }

    #[test]
    fn test_format_tree_max_depth() {
        let options = TreeOptions {
            max_depth: Some(1),
            ..Default::default()
        };
        let output = format_tree(&sample_tree(), &options);
        assert!(output.contains("begin_block"));
        assert!(!output.contains("playerLevel"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&RecordValue::None), "");
        assert_eq!(format_value(&RecordValue::Boolean(false)), "false");
        assert_eq!(format_value(&RecordValue::Text("a b".into())), "\"a b\"");
        assert_eq!(
            format_value(&RecordValue::Bytes(b"Records/x.dbr".to_vec())),
            "\"Records/x.dbr\""
        );
        assert_eq!(format_value(&RecordValue::Bytes(vec![0x00, 0xFF])), "[00 FF]");
    }

    #[test]
    fn test_format_long_bytes_truncated() {
        let preview = format_value(&RecordValue::Bytes(vec![0x01; 40]));
        assert!(preview.ends_with("… (40 bytes)]"));
    }

    #[test]
    fn test_format_summary_plain() {
        let save = PlayerSave {
            name: "Thea".to_string(),
            class: "Warfare".to_string(),
            level: 12,
            is_in_main_quest: true,
            ..Default::default()
        };
        let output = format_summary(&save, false);

        assert!(output.contains("  Thea\n"));
        assert!(output.contains("Class:       Warfare"));
        assert!(output.contains("Level:       12"));
        assert!(output.contains("Main quest:  yes"));
    }
}
