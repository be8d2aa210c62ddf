//! Recursive block parser and the decode entry points.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::chr::cursor::ByteCursor;
use crate::chr::record::{Record, RecordKind};
use crate::chr::registry::{KeyRegistry, Lookup};
use crate::chr::scanner::{ScannedKey, scan_key};
use crate::chr::value::{DecodedValue, decode_value, read_block_header};
use crate::config::format::{END_BLOCK, FILE_MARKER};
use crate::config::{DecodeOptions, UnknownKeyPolicy};
use crate::error::{Error, Result};

/// A key that was not found in the registry and was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownKey {
    pub key: String,
    /// Offset of the key text.
    pub position: usize,
    /// Block nesting depth the key was found at (0 = top level).
    pub depth: usize,
}

/// Result of decoding a file: the record tree plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub root: Record,
    /// Non-empty keys that were dropped because the registry does not know them.
    pub diagnostics: Vec<UnknownKey>,
    /// Number of empty keys dropped (the scanner landing on a length byte).
    pub empty_keys: usize,
}

impl Decoded {
    pub fn has_unknown_keys(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Decodes a character file into its record tree.
///
/// # Errors
///
/// Returns `Error::InvalidFormat` if the buffer does not start with the file
/// marker and `Error::OutOfRange` if decoding runs past the end of the buffer.
pub fn decode(data: &[u8]) -> Result<Record> {
    decode_with_options(data, &DecodeOptions::default()).map(|decoded| decoded.root)
}

/// Decodes a character file, reporting dropped keys alongside the tree.
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    debug!("Decoding character file ({} bytes)", data.len());

    let mut parser = BlockParser::new(data, options);
    parser.verify_file_start()?;

    let mut root = Record::root(data.len());
    root.children = parser.read_records()?;

    debug!(
        "Decoded {} records ({} unknown keys, {} empty keys)",
        root.count(),
        parser.diagnostics.len(),
        parser.empty_keys
    );

    Ok(Decoded {
        root,
        diagnostics: parser.diagnostics,
        empty_keys: parser.empty_keys,
    })
}

/// Reads a character file from disk and decodes it.
pub fn decode_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Decoded> {
    let data = fs::read(path.as_ref())?;
    debug!("Loaded {:?}", path.as_ref());
    decode_with_options(&data, options)
}

/// A block whose children are still being read.
struct OpenBlock {
    key: ScannedKey,
    header: DecodedValue,
    children: Vec<Record>,
}

impl OpenBlock {
    fn into_record(self) -> Record {
        Record {
            kind: RecordKind::BlockStart,
            value: self.header.value,
            children: self.children,
            key_start: self.key.key_start,
            key_end: self.key.key_end,
            value_start: self.header.start,
            value_end: self.header.end,
            start: self.key.scan_start,
            end: self.header.end,
            key: self.key.text,
        }
    }
}

/// Builds the record tree with an explicit stack of open blocks, so nesting
/// depth is bounded by memory rather than the call stack.
struct BlockParser<'a> {
    cursor: ByteCursor<'a>,
    registry: &'static KeyRegistry,
    options: &'a DecodeOptions,
    diagnostics: Vec<UnknownKey>,
    empty_keys: usize,
    blocks: Vec<OpenBlock>,
}

impl<'a> BlockParser<'a> {
    fn new(data: &'a [u8], options: &'a DecodeOptions) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            registry: KeyRegistry::global(),
            options,
            diagnostics: Vec::new(),
            empty_keys: 0,
            blocks: Vec::new(),
        }
    }

    fn verify_file_start(&mut self) -> Result<()> {
        let found = self.cursor.peek(0).ok();
        if found != Some(FILE_MARKER) {
            return Err(Error::InvalidFormat {
                expected: FILE_MARKER,
                found,
            });
        }
        self.cursor.advance(1)
    }

    fn depth(&self) -> usize {
        self.blocks.len()
    }

    /// Reads every record after the file marker.
    ///
    /// The top level stops once fewer than two bytes remain; a block stops at
    /// its `end_block` record or at the end of the buffer.
    fn read_records(&mut self) -> Result<Vec<Record>> {
        let mut top_level = Vec::new();

        loop {
            let finished = if self.blocks.is_empty() {
                self.cursor.is_exhausted()
            } else {
                self.cursor.is_at_end()
            };

            if finished {
                if self.blocks.is_empty() {
                    break;
                }
                self.close_block(&mut top_level);
                continue;
            }

            let key = scan_key(&mut self.cursor)?;
            match self.registry.lookup(&key.text) {
                Lookup::Unknown => self.report_unknown(&key)?,
                Lookup::Known(RecordKind::BlockStart) => self.open_block(key)?,
                Lookup::Known(kind) => {
                    let record = self.read_record(key, kind)?;
                    let closes = record.key == END_BLOCK;
                    self.push_record(record, &mut top_level);
                    if closes && !self.blocks.is_empty() {
                        self.close_block(&mut top_level);
                    }
                }
            }
        }

        Ok(top_level)
    }

    fn read_record(&mut self, key: ScannedKey, kind: RecordKind) -> Result<Record> {
        let value = decode_value(&mut self.cursor, kind, key.key_end)?;
        trace!(
            "{:>width$}{} ({}) at {}..{}",
            "",
            key.text,
            kind,
            value.start,
            value.end,
            width = self.depth() * 2
        );

        Ok(Record {
            kind,
            value: value.value,
            children: Vec::new(),
            key_start: key.key_start,
            key_end: key.key_end,
            value_start: value.start,
            value_end: value.end,
            start: key.scan_start,
            end: self.cursor.position(),
            key: key.text,
        })
    }

    /// Reads a block header and makes the block the target for new records.
    fn open_block(&mut self, key: ScannedKey) -> Result<()> {
        let header = read_block_header(&mut self.cursor)?;
        let key_start = key.key_start;
        self.blocks.push(OpenBlock {
            key,
            header,
            children: Vec::new(),
        });
        debug!("Entering block at {} (depth {})", key_start, self.depth());
        Ok(())
    }

    /// Finishes the innermost block and attaches it to its parent.
    fn close_block(&mut self, top_level: &mut Vec<Record>) {
        if let Some(block) = self.blocks.pop() {
            debug!(
                "Leaving block at {} with {} children",
                block.key.key_start,
                block.children.len()
            );
            let record = block.into_record();
            self.push_record(record, top_level);
        }
    }

    fn push_record(&mut self, record: Record, top_level: &mut Vec<Record>) {
        match self.blocks.last_mut() {
            Some(parent) => parent.children.push(record),
            None => top_level.push(record),
        }
    }

    fn report_unknown(&mut self, key: &ScannedKey) -> Result<()> {
        if key.is_empty() {
            self.empty_keys += 1;
            trace!("Dropped empty key at {}", key.key_start);
            return Ok(());
        }

        debug!(
            "Unknown key {:?} at {} (depth {}), no value bytes consumed",
            key.text, key.key_start, self.depth()
        );

        if self.options.unknown_keys == UnknownKeyPolicy::Reject {
            return Err(Error::UnknownKey {
                key: key.text.clone(),
                position: key.key_start,
            });
        }

        if self.options.collect_diagnostics {
            self.diagnostics.push(UnknownKey {
                key: key.text.clone(),
                position: key.key_start,
                depth: self.depth(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chr::mock::ChrFileBuilder;
    use crate::chr::record::RecordValue;

    #[test]
    fn test_rejects_missing_marker() {
        let err = decode(&[0x41, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFormat {
                expected: 0x0D,
                found: Some(0x41)
            }
        ));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { found: None, .. }));
    }

    #[test]
    fn test_marker_only_yields_empty_root() {
        let root = decode(&[0x0D]).unwrap();
        assert_eq!(root.kind, RecordKind::File);
        assert!(root.children.is_empty());
        assert_eq!((root.start, root.end), (0, 1));
    }

    #[test]
    fn test_single_integer_record() {
        let mut data = vec![0x0D, 0x00, 0x00, 0x00];
        data.extend_from_slice(b"headerVersion");
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);

        let root = decode(&data).unwrap();
        assert_eq!(root.children.len(), 1);

        let record = &root.children[0];
        assert_eq!(record.key, "headerVersion");
        assert_eq!(record.kind, RecordKind::Integer);
        assert_eq!(record.value, RecordValue::Integer(2));
        assert_eq!((record.key_start, record.key_end), (4, 17));
        assert_eq!((record.value_start, record.value_end), (20, 21));
        assert_eq!((record.start, record.end), (1, 21));
    }

    #[test]
    fn test_block_with_only_end_block() {
        let data = ChrFileBuilder::new().begin_block().end_block().build();
        // Leading length byte of "begin_block" is not the file marker
        let mut file = vec![0x0D];
        file.extend_from_slice(&data[1..]);

        let root = decode(&file).unwrap();
        assert_eq!(root.children.len(), 1);

        let block = &root.children[0];
        assert_eq!(block.kind, RecordKind::BlockStart);
        assert_eq!(block.children.len(), 1);
        assert_eq!(block.children[0].key, "end_block");
        assert_eq!(block.children[0].kind, RecordKind::BlockEnd);
        // 4-byte header skipped, then the next key's length byte read raw
        assert_eq!(block.value, RecordValue::Bytes(vec![0x09]));
        assert_eq!((block.value_start, block.value_end), (19, 20));
        assert_eq!(block.end, 20);
    }

    #[test]
    fn test_unknown_key_consumes_no_value_bytes() {
        let data = ChrFileBuilder::new()
            .int("headerVersion", 1)
            .key("mysteryField")
            .int("money", 3)
            .end_block()
            .build();

        let decoded = decode_with_options(&data, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].key, "mysteryField");
        assert_eq!(decoded.diagnostics[0].depth, 0);

        let keys: Vec<&str> = decoded.root.children.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["headerVersion", "money", "end_block"]);
    }

    #[test]
    fn test_strict_mode_rejects_unknown_key() {
        let data = ChrFileBuilder::new()
            .int("headerVersion", 1)
            .key("mysteryField")
            .end_block()
            .build();

        let err = decode_with_options(&data, &DecodeOptions::strict()).unwrap_err();
        match err {
            Error::UnknownKey { key, position } => {
                assert_eq!(key, "mysteryField");
                assert_eq!(position, 25);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_diagnostics_can_be_disabled() {
        let data = ChrFileBuilder::new()
            .int("headerVersion", 1)
            .key("mysteryField")
            .end_block()
            .build();

        let options = DecodeOptions::new().collect_diagnostics(false);
        let decoded = decode_with_options(&data, &options).unwrap();
        assert!(!decoded.has_unknown_keys());
        assert!(decoded.empty_keys > 0);
    }

    #[test]
    fn test_deeply_nested_blocks() {
        const DEPTH: usize = 100_000;

        let mut builder = ChrFileBuilder::new().int("headerVersion", 1);
        for _ in 0..DEPTH {
            builder = builder.begin_block();
        }
        for _ in 0..DEPTH {
            builder = builder.end_block();
        }

        let root = decode(&builder.build()).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.count(), 1 + 2 * DEPTH);
        // Innermost end_block sits one level below the innermost block
        assert_eq!(root.walk().map(|(depth, _)| depth).max(), Some(DEPTH + 1));
        assert!(
            root.walk()
                .filter(|(_, r)| r.is_block())
                .all(|(_, r)| r.is_closed_block())
        );
    }

    #[test]
    fn test_unclosed_blocks_end_with_buffer() {
        let data = ChrFileBuilder::new()
            .int("headerVersion", 1)
            .begin_block()
            .begin_block()
            .raw("skillName", b"x")
            .build();

        let root = decode(&data).unwrap();
        let outer = root.child("begin_block").unwrap();
        let inner = outer.child("begin_block").unwrap();

        assert_eq!(outer.children.len(), 1);
        assert_eq!(inner.children.len(), 1);
        assert_eq!(inner.children[0].value, RecordValue::Bytes(b"x".to_vec()));
        assert!(!outer.is_closed_block());
        assert!(!inner.is_closed_block());
    }
}
