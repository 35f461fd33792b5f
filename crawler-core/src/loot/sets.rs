//! Item sets: the five standard sets and one exclusive set per boss.

use super::{Rarity, StatType};
use crate::monster::BossId;

/// A named armor/accessory set keyed to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSet {
    pub name: &'static str,
    pub base_stat: StatType,
    /// Overrides the rarity colour (boss sets only)
    pub color: Option<&'static str>,
}

impl ItemSet {
    pub fn color_for(&self, rarity: Rarity) -> &'static str {
        self.color.unwrap_or_else(|| rarity.color())
    }
}

pub const STANDARD_SETS: [ItemSet; 5] = [
    ItemSet {
        name: "Warlord",
        base_stat: StatType::Strength,
        color: None,
    },
    ItemSet {
        name: "Ranger",
        base_stat: StatType::Agility,
        color: None,
    },
    ItemSet {
        name: "Sorcerer",
        base_stat: StatType::Intelligence,
        color: None,
    },
    ItemSet {
        name: "Guardian",
        base_stat: StatType::Vitality,
        color: None,
    },
    ItemSet {
        name: "Assassin",
        base_stat: StatType::Perception,
        color: None,
    },
];

/// Exclusive set dropped by a boss
pub fn boss_set(boss: BossId) -> ItemSet {
    match boss {
        BossId::Kargal => ItemSet {
            name: "Iron Will",
            base_stat: StatType::Vitality,
            color: Some("#64748b"),
        },
        BossId::Xerath => ItemSet {
            name: "Sandstorm",
            base_stat: StatType::Agility,
            color: Some("#eab308"),
        },
        BossId::Elara => ItemSet {
            name: "Nature's Wrath",
            base_stat: StatType::Intelligence,
            color: Some("#22c55e"),
        },
    }
}
