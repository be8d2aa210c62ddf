use serde::{Deserialize, Serialize};

use crate::chr::encoding::encode_cp1252;
use crate::chr::{Record, RecordValue};

/// Summary of a player's saved character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub id: String,
    pub name: String,
    pub class: String,
    pub level: u8,
    pub is_in_main_quest: bool,
}

impl Default for PlayerSave {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            class: String::new(),
            level: Self::MIN_LEVEL,
            is_in_main_quest: false,
        }
    }
}

impl PlayerSave {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 80;

    pub const ID_KEY: &'static str = "uniqueId";
    pub const NAME_KEY: &'static str = "myPlayerName";
    pub const CLASS_KEY: &'static str = "playerCharacterClass";
    pub const LEVEL_KEY: &'static str = "playerLevel";
    pub const MAIN_QUEST_KEY: &'static str = "isInMainQuest";

    /// Build a summary from a decoded file.
    ///
    /// Each key is looked up among the root's direct children first, then in
    /// nested blocks. Missing or mistyped fields keep their defaults.
    pub fn from_record(root: &Record) -> Self {
        let defaults = Self::default();

        Self {
            id: lookup_text(root, Self::ID_KEY).unwrap_or(defaults.id),
            name: lookup_text(root, Self::NAME_KEY).unwrap_or(defaults.name),
            class: lookup_text(root, Self::CLASS_KEY).unwrap_or(defaults.class),
            level: lookup(root, Self::LEVEL_KEY)
                .and_then(RecordValue::as_integer)
                .map(|level| level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL))
                .unwrap_or(defaults.level),
            is_in_main_quest: lookup(root, Self::MAIN_QUEST_KEY)
                .and_then(RecordValue::as_bool)
                .unwrap_or(defaults.is_in_main_quest),
        }
    }

    /// Identifier bytes rendered as lowercase hex.
    pub fn id_hex(&self) -> String {
        encode_cp1252(&self.id)
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl From<&Record> for PlayerSave {
    fn from(root: &Record) -> Self {
        Self::from_record(root)
    }
}

fn lookup<'a>(root: &'a Record, key: &str) -> Option<&'a RecordValue> {
    root.child(key)
        .or_else(|| root.find(key))
        .map(|record| &record.value)
}

fn lookup_text(root: &Record, key: &str) -> Option<String> {
    lookup(root, key)
        .and_then(RecordValue::as_text)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chr::RecordKind;

    fn record(key: &str, kind: RecordKind, value: RecordValue) -> Record {
        let mut record = Record::root(0);
        record.key = key.to_string();
        record.kind = kind;
        record.value = value;
        record
    }

    #[test]
    fn test_defaults_for_empty_tree() {
        let save = PlayerSave::from_record(&Record::root(10));
        assert_eq!(save, PlayerSave::default());
        assert_eq!(save.level, 1);
    }

    #[test]
    fn test_projection_reads_direct_children() {
        let mut root = Record::root(100);
        root.children.push(record(
            "myPlayerName",
            RecordKind::Text,
            RecordValue::Text("Thea".into()),
        ));
        root.children.push(record(
            "playerCharacterClass",
            RecordKind::Text,
            RecordValue::Text("Warfare".into()),
        ));
        root.children
            .push(record("playerLevel", RecordKind::Integer, RecordValue::Integer(42)));
        root.children.push(record(
            "isInMainQuest",
            RecordKind::Boolean,
            RecordValue::Boolean(true),
        ));

        let save = PlayerSave::from(&root);
        assert_eq!(save.name, "Thea");
        assert_eq!(save.class, "Warfare");
        assert_eq!(save.level, 42);
        assert!(save.is_in_main_quest);
    }

    #[test]
    fn test_direct_child_wins_over_nested() {
        let mut block = record("begin_block", RecordKind::BlockStart, RecordValue::None);
        block
            .children
            .push(record("playerLevel", RecordKind::Integer, RecordValue::Integer(5)));

        let mut root = Record::root(100);
        root.children.push(block);
        root.children
            .push(record("playerLevel", RecordKind::Integer, RecordValue::Integer(9)));

        assert_eq!(PlayerSave::from_record(&root).level, 9);

        root.children.pop();
        assert_eq!(PlayerSave::from_record(&root).level, 5);
    }

    #[test]
    fn test_level_is_clamped() {
        let mut root = Record::root(10);
        root.children
            .push(record("playerLevel", RecordKind::Integer, RecordValue::Integer(0)));
        assert_eq!(PlayerSave::from_record(&root).level, 1);

        root.children[0].value = RecordValue::Integer(200);
        assert_eq!(PlayerSave::from_record(&root).level, 80);
    }

    #[test]
    fn test_id_hex() {
        let save = PlayerSave {
            id: "\u{12}\u{ab}\u{20ac}".to_string(),
            ..Default::default()
        };
        assert_eq!(save.id_hex(), "12ab80");
    }
}
