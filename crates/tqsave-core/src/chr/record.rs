use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::chr::encoding::decode_cp1252;

/// How the bytes following a key are interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
pub enum RecordKind {
    /// Synthetic root of a decoded file.
    File,
    Integer,
    Boolean,
    Text,
    Identifier,
    RawBytes,
    BlockStart,
    BlockEnd,
    Page,
    Unknown,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// True for kinds whose payload is an opaque byte sequence.
    pub fn is_raw(&self) -> bool {
        matches!(
            self,
            Self::RawBytes | Self::BlockStart | Self::BlockEnd | Self::Page
        )
    }
}

/// Decoded payload of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RecordValue {
    #[default]
    None,
    Integer(u8),
    Boolean(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl RecordValue {
    pub fn as_integer(&self) -> Option<u8> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Bytes payload decoded as code page 1252 text.
    ///
    /// Raw values are frequently record paths such as skill names.
    pub fn bytes_as_text(&self) -> Option<String> {
        self.as_bytes().map(decode_cp1252)
    }
}

/// A decoded key/value record with byte provenance.
///
/// All offsets index the source buffer and ranges are half-open, so
/// `key_start..key_end` is exactly the key text and `value_start..value_end`
/// the value payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub kind: RecordKind,
    pub value: RecordValue,
    pub children: Vec<Record>,
    pub key_start: usize,
    pub key_end: usize,
    pub value_start: usize,
    pub value_end: usize,
    pub start: usize,
    pub end: usize,
}

impl Record {
    /// Creates the root record spanning a buffer of `len` bytes.
    pub fn root(len: usize) -> Self {
        Self {
            key: String::new(),
            kind: RecordKind::File,
            value: RecordValue::None,
            children: Vec::new(),
            key_start: 0,
            key_end: 0,
            value_start: 0,
            value_end: 0,
            start: 0,
            end: len,
        }
    }

    pub fn length(&self) -> usize {
        self.end - self.start
    }

    pub fn key_length(&self) -> usize {
        self.key_end - self.key_start
    }

    pub fn value_length(&self) -> usize {
        self.value_end - self.value_start
    }

    pub fn is_root(&self) -> bool {
        self.kind == RecordKind::File
    }

    pub fn is_block(&self) -> bool {
        self.kind == RecordKind::BlockStart
    }

    /// First direct child with the given key.
    pub fn child(&self, key: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.key == key)
    }

    /// First descendant with the given key, depth-first in buffer order.
    pub fn find(&self, key: &str) -> Option<&Record> {
        self.walk().map(|(_, r)| r).find(|r| r.key == key)
    }

    /// All descendants with the given key, in buffer order.
    pub fn find_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.walk().map(|(_, r)| r).filter(move |r| r.key == key)
    }

    /// Pre-order iterator over all descendants with their depth (direct children are depth 1).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.children.iter().rev().map(|c| (1, c)).collect(),
        }
    }

    /// Number of descendant records.
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// True if this block's last child closes it.
    pub fn is_closed_block(&self) -> bool {
        self.is_block()
            && self
                .children
                .last()
                .is_some_and(|c| c.kind == RecordKind::BlockEnd)
    }
}

impl Drop for Record {
    // Flattens the subtree so deeply nested blocks do not recurse on drop.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut record) = pending.pop() {
            pending.append(&mut record.children);
        }
    }
}

/// Iterator returned by [`Record::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Record)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Record);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, record) = self.stack.pop()?;
        self.stack
            .extend(record.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, record))
    }
}
