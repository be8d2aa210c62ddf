//! Key-type registry: the implicit schema of character files.
//!
//! Files carry no type tags, so the kind of every value is looked up from the
//! key that precedes it. The table is fixed at compile time and the lookup map
//! is built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::chr::record::RecordKind::{
    self, BlockEnd, BlockStart, Boolean, Identifier, Integer, Page, RawBytes, Text,
};

/// Every key the format is known to emit, with its value kind.
///
/// Some names contain characters the key scanner never accepts (`.`, `[`,
/// `(`); they are kept so the table stays a complete description of the format.
pub const KEY_TYPES: &[(&str, RecordKind)] = &[
    ("headerVersion", Integer),
    ("playerCharacterClass", Text),
    ("uniqueId", Identifier),
    ("streamData", RawBytes),
    ("playerClassTag", Text),
    ("playerLevel", Integer),
    ("playerVersion", Integer),
    ("begin_block", BlockStart),
    ("end_block", BlockEnd),
    ("myPlayerName", Text),
    ("isInMainQuest", Boolean),
    ("disableAutoPopV2", Boolean),
    ("numTutorialPagesV2", Page),
    ("currentPageV2", Page),
    ("versionCheckTeleportInfo", Integer),
    ("teleportUIDsSize", Integer),
    ("teleportUID", Identifier),
    ("versionCheckMovementInfo", Integer),
    ("markerUIDsSize", Integer),
    ("markerUID", Identifier),
    ("versionCheckRespawnInfo", Integer),
    ("respawnUIDsSize", Integer),
    ("respawnUID", Identifier),
    // Kind not confirmed against real files
    ("versionRespawnPoint", Boolean),
    ("strategicMovementRespawnPoint[i]", RawBytes),
    ("money", Integer),
    ("altMoney", Integer),
    ("compassState", Integer),
    ("skillWindowShowHelp", Boolean),
    ("alternateConfig", Boolean),
    ("alternateConfigEnabled", Boolean),
    ("playerTexture", RawBytes),
    ("itemsFoundOverLifetimeUniqueTotal", Integer),
    ("itemsFoundOverLifetimeRandomizedTotal", Integer),
    ("temp", Integer),
    ("hasBeenInGame", Boolean),
    ("boosterCharacterForX4", Boolean),
    ("tartarusDefeatedCount[i]", Integer),
    ("max", Integer),
    ("skillName", RawBytes),
    ("skillLevel", Integer),
    ("skillEnabled", Boolean),
    ("skillSubLevel", Integer),
    ("skillActive", Boolean),
    ("skillTransition", Boolean),
    ("masteriesAllowed", Integer),
    ("skillReclamationPointsUsed", Integer),
    ("hasSkillServices", Boolean),
    ("version", Integer),
    ("size", Integer),
    ("equipmentSelection", Integer),
    ("skillWindowSelection", Integer),
    ("skillSettingValid", Boolean),
    ("primarySkill1", Integer),
    ("secondarySkill1", Integer),
    ("skillActive1", Boolean),
    ("primarySkill2", Integer),
    ("secondarySkill2", Integer),
    ("skillActive2", Boolean),
    ("primarySkill3", Integer),
    ("secondarySkill3", Integer),
    ("skillActive3", Boolean),
    ("primarySkill4", Integer),
    ("secondarySkill4", Integer),
    ("skillActive4", Boolean),
    ("primarySkill5", Integer),
    ("secondarySkill5", Integer),
    ("skillActive5", Boolean),
    ("currentStats.charLevel", Integer),
    ("currentStats.experiencePoints", Integer),
    ("modifierPoints", Integer),
    ("skillPoints", Integer),
    ("playTimeInSeconds", Integer),
    ("numberOfDeaths", Integer),
    ("numberOfKills", Integer),
    ("experienceFromKills", Integer),
    ("healthPotionsUsed", Integer),
    ("manaPotionsUsed", Integer),
    ("maxLevel", Integer),
    ("numHitsReceived", Integer),
    ("numHitsInflicted", Integer),
    ("greatestDamageInflicted", Integer),
    ("(*greatestMonsterKilledName)[i]", Text),
    ("(*greatestMonsterKilledLevel)[i]", Integer),
    ("(*greatestMonsterKilledLifeAndMana)[i]", Integer),
    ("criticalHitsReceived", Integer),
    ("criticalHitsInflicted", Integer),
    ("itemPositionsSavedAsGridCoords", Boolean),
    ("numberOfSacks", Integer),
    ("currentlyFocusedSackNumber", Integer),
    ("currentlySelectedSackNumber", Integer),
    ("tempBool", Boolean),
    ("pointX", Integer),
    ("pointY", Integer),
    ("baseName", RawBytes),
    ("prefixName", RawBytes),
    ("suffixName", RawBytes),
    ("relicName", RawBytes),
    ("relicBonus", RawBytes),
    ("seed", Integer),
    ("var1", Integer),
    ("relicName2", RawBytes),
    ("relicBonus2", RawBytes),
    ("var2", Integer),
    ("controllerStreamed", Boolean),
    ("useAlternate", Boolean),
    ("equipmentCtrlOStreamVersion", Integer),
    ("itemAttached", Boolean),
    ("storedType", Integer),
    ("isItemSkill", Boolean),
    ("itemName", RawBytes),
    ("description", RawBytes),
];

static REGISTRY: LazyLock<KeyRegistry> = LazyLock::new(|| KeyRegistry::from_table(KEY_TYPES));

/// Outcome of a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Known(RecordKind),
    Unknown,
}

impl Lookup {
    /// The record kind, with `RecordKind::Unknown` for unknown keys.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Known(kind) => *kind,
            Self::Unknown => RecordKind::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Immutable mapping from key text to record kind.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    kinds: HashMap<&'static str, RecordKind>,
}

impl KeyRegistry {
    /// The process-wide registry built from [`KEY_TYPES`].
    pub fn global() -> &'static KeyRegistry {
        &REGISTRY
    }

    fn from_table(table: &[(&'static str, RecordKind)]) -> Self {
        Self {
            kinds: table.iter().copied().collect(),
        }
    }

    pub fn lookup(&self, key: &str) -> Lookup {
        match self.kinds.get(key) {
            Some(kind) => Lookup::Known(*kind),
            None => Lookup::Unknown,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kinds.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterates over all registered keys and kinds, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RecordKind)> + '_ {
        self.kinds.iter().map(|(k, v)| (*k, *v))
    }
}
