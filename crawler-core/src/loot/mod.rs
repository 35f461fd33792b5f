//! Loot generation and the item model.
//!
//! Every dropped item comes out of one factory: rarity decides the affix
//! count, power bonus and primary scaling grade; the slot decides whether the
//! item is a weapon (scaling grades) or armor/accessory (a fixed set bonus).
//! Boss drops force rarity from the dungeon rank and use the boss's own set.

pub mod sets;
pub mod shop;

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::generation::Rank;
use crate::monster::BossId;
use crate::world::IdAllocator;
use sets::{boss_set, ItemSet, STANDARD_SETS};

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Map a uniform [0, 1) draw onto the drop distribution
    pub fn from_roll(draw: f64) -> Self {
        if draw > 0.95 {
            Rarity::Legendary
        } else if draw > 0.85 {
            Rarity::Epic
        } else if draw > 0.6 {
            Rarity::Rare
        } else {
            Rarity::Common
        }
    }

    /// Boss drops are graded by the gate's rank
    pub fn for_rank(rank: Rank) -> Self {
        match rank {
            Rank::E | Rank::D => Rarity::Rare,
            Rank::C | Rank::B => Rarity::Epic,
            Rank::A | Rank::S => Rarity::Legendary,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#94a3b8",
            Rarity::Rare => "#3b82f6",
            Rarity::Epic => "#a855f7",
            Rarity::Legendary => "#f59e0b",
        }
    }

    pub fn affix_count(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Epic => 2,
            Rarity::Legendary => 3,
        }
    }

    pub fn power_bonus(&self) -> f32 {
        match self {
            Rarity::Common => 0.0,
            Rarity::Rare => 0.1,
            Rarity::Epic => 0.2,
            Rarity::Legendary => 0.3,
        }
    }

    /// Scaling grade of a weapon's primary attribute
    pub fn primary_grade(&self) -> ScalingGrade {
        match self {
            Rarity::Common => ScalingGrade::C,
            Rarity::Rare => ScalingGrade::B,
            Rarity::Epic => ScalingGrade::A,
            Rarity::Legendary => ScalingGrade::S,
        }
    }

    fn weapon_prefix(&self) -> &'static str {
        match self {
            Rarity::Common => "Rusty",
            Rarity::Rare => "Iron",
            Rarity::Epic => "Shadow",
            Rarity::Legendary => "Demon",
        }
    }
}

/// The five player attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Strength,
    Agility,
    Vitality,
    Perception,
    Intelligence,
}

impl StatType {
    pub const ALL: [StatType; 5] = [
        StatType::Strength,
        StatType::Agility,
        StatType::Vitality,
        StatType::Perception,
        StatType::Intelligence,
    ];
}

/// Letter grade for how strongly an attribute feeds a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalingGrade {
    S,
    A,
    B,
    C,
    D,
    E,
    #[default]
    None,
}

impl ScalingGrade {
    pub fn factor(&self) -> f32 {
        match self {
            ScalingGrade::S => 2.5,
            ScalingGrade::A => 2.0,
            ScalingGrade::B => 1.5,
            ScalingGrade::C => 1.0,
            ScalingGrade::D => 0.75,
            ScalingGrade::E => 0.5,
            ScalingGrade::None => 0.0,
        }
    }
}

/// Per-attribute scaling grades of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scaling {
    pub strength: ScalingGrade,
    pub agility: ScalingGrade,
    pub intelligence: ScalingGrade,
}

/// A flat attribute bonus (fixed set bonus or affix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: StatType,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Sword,
    Bow,
    Staff,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Sword, WeaponKind::Bow, WeaponKind::Staff];

    pub fn base_attack_speed(&self) -> f32 {
        match self {
            WeaponKind::Sword => 1.5,
            WeaponKind::Bow => 2.0,
            WeaponKind::Staff => 0.8,
        }
    }

    pub fn base_range(&self) -> f32 {
        match self {
            WeaponKind::Sword => 80.0,
            WeaponKind::Bow | WeaponKind::Staff => 400.0,
        }
    }

    /// Primary attribute gets the rarity grade; the rest are fixed per kind
    pub fn scaling(&self, primary: ScalingGrade) -> Scaling {
        match self {
            WeaponKind::Sword => Scaling {
                strength: primary,
                agility: ScalingGrade::D,
                intelligence: ScalingGrade::None,
            },
            WeaponKind::Bow => Scaling {
                strength: ScalingGrade::E,
                agility: primary,
                intelligence: ScalingGrade::None,
            },
            WeaponKind::Staff => Scaling {
                strength: ScalingGrade::None,
                agility: ScalingGrade::None,
                intelligence: primary,
            },
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            WeaponKind::Sword => "Blade",
            WeaponKind::Bow => "Longbow",
            WeaponKind::Staff => "Staff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponKind),
    Armor,
    Accessory,
}

/// The ten equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    MainHand,
    Head,
    Chest,
    Legs,
    Boots,
    Gloves,
    Cape,
    Neck,
    Ring1,
    Ring2,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 10] = [
        EquipSlot::MainHand,
        EquipSlot::Head,
        EquipSlot::Chest,
        EquipSlot::Legs,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Cape,
        EquipSlot::Neck,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
    ];

    pub const ARMOR: [EquipSlot; 6] = [
        EquipSlot::Head,
        EquipSlot::Chest,
        EquipSlot::Legs,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Cape,
    ];

    /// Generated rings always target RING1; equipping may move them to RING2
    pub const ACCESSORY: [EquipSlot; 2] = [EquipSlot::Neck, EquipSlot::Ring1];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_ring(&self) -> bool {
        matches!(self, EquipSlot::Ring1 | EquipSlot::Ring2)
    }

    /// Weight of the slot in the fixed set bonus formula
    pub fn stat_multiplier(&self) -> f32 {
        match self {
            EquipSlot::MainHand => 0.0,
            EquipSlot::Head => 3.0,
            EquipSlot::Chest => 5.0,
            EquipSlot::Legs => 4.0,
            EquipSlot::Boots | EquipSlot::Gloves | EquipSlot::Neck => 2.0,
            EquipSlot::Cape | EquipSlot::Ring1 | EquipSlot::Ring2 => 1.0,
        }
    }

    /// Noun used in generated armor names
    pub fn item_noun(&self) -> &'static str {
        match self {
            EquipSlot::MainHand => "Item",
            EquipSlot::Head => "Helm",
            EquipSlot::Chest => "Armor",
            EquipSlot::Legs => "Leggings",
            EquipSlot::Boots => "Boots",
            EquipSlot::Gloves => "Gauntlets",
            EquipSlot::Cape => "Cape",
            EquipSlot::Neck => "Amulet",
            EquipSlot::Ring1 | EquipSlot::Ring2 => "Ring",
        }
    }

    /// Whether an item generated for `self` may sit in `target`
    pub fn accepts(&self, target: EquipSlot) -> bool {
        *self == target || (self.is_ring() && target.is_ring())
    }
}

/// An equippable item. Immutable after generation except for its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub kind: ItemKind,
    pub slot: EquipSlot,
    pub rarity: Rarity,
    pub set_name: Option<String>,
    pub base_damage: f32,
    pub base_attack_speed: f32,
    pub base_range: f32,
    pub power: f32,
    pub quality: f32,
    pub base_stat: Option<StatBonus>,
    pub scaling: Scaling,
    pub affixes: Vec<StatBonus>,
    pub color: String,
    pub price: u64,
}

impl Item {
    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        match self.kind {
            ItemKind::Weapon(kind) => Some(kind),
            _ => None,
        }
    }

    /// Shops buy back at half price
    pub fn sell_price(&self) -> u64 {
        self.price / 2
    }

    /// All flat attribute bonuses this item grants while equipped
    pub fn bonuses(&self) -> impl Iterator<Item = &StatBonus> {
        self.base_stat.iter().chain(self.affixes.iter())
    }
}

/// An item lying in the dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundItem {
    pub pos: Vec2,
    pub item: Item,
}

/// Experience pickup scattered on enemy death
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: u32,
    pub radius: f32,
    pub color: String,
}

pub const XP_ORB_VALUE: u32 = 10;
const XP_ORB_COLOR: &str = "#00ffff";

/// Roll a random drop at `pos` for a player of `level`
pub fn generate_loot<R: Rng + ?Sized>(
    pos: Vec2,
    level: u32,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> GroundItem {
    let rarity = Rarity::from_roll(rng.gen::<f64>());
    let slot = roll_slot(rng.gen::<f64>(), rng);
    let set = STANDARD_SETS[rng.gen_range(0..STANDARD_SETS.len())];
    let item = build_item(rarity, slot, level, set, ids, rng);
    trace!(name = %item.name, ?rarity, "loot rolled");
    GroundItem { pos, item }
}

/// Boss drop: rank-forced rarity and the boss's exclusive set.
///
/// Boss drops are always armor or accessories so the set bonus applies.
pub fn generate_boss_loot<R: Rng + ?Sized>(
    pos: Vec2,
    level: u32,
    boss: BossId,
    rank: Rank,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> GroundItem {
    let rarity = Rarity::for_rank(rank);
    // skip the weapon bucket (top 20% of the roll)
    let slot = roll_slot(rng.gen_range(0.0..0.8), rng);
    let item = build_item(rarity, slot, level, boss_set(boss), ids, rng);
    GroundItem { pos, item }
}

/// Split `amount` experience into orbs flying outward from `pos`
pub fn generate_xp_orbs<R: Rng + ?Sized>(
    pos: Vec2,
    amount: u32,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Vec<ExperienceOrb> {
    let count = amount.div_ceil(XP_ORB_VALUE);
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(50.0..150.0);
            ExperienceOrb {
                id: ids.next_id(),
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                value: XP_ORB_VALUE,
                radius: rng.gen_range(4.0..6.0),
                color: XP_ORB_COLOR.to_string(),
            }
        })
        .collect()
}

/// Weighted slot roll: 20% weapon, 50% armor, 30% accessory
fn roll_slot<R: Rng + ?Sized>(draw: f64, rng: &mut R) -> EquipSlot {
    if draw > 0.8 {
        EquipSlot::MainHand
    } else if draw > 0.3 {
        EquipSlot::ARMOR[rng.gen_range(0..EquipSlot::ARMOR.len())]
    } else {
        EquipSlot::ACCESSORY[rng.gen_range(0..EquipSlot::ACCESSORY.len())]
    }
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

fn build_item<R: Rng + ?Sized>(
    rarity: Rarity,
    slot: EquipSlot,
    level: u32,
    set: ItemSet,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Item {
    // product of two uniforms skews quality low
    let quality = if rarity == Rarity::Legendary {
        rng.gen_range(3.0..5.0)
    } else {
        0.5 + rng.gen::<f32>() * rng.gen::<f32>() * 4.5
    };
    let quality = round_to(quality, 1);

    let power = 0.8 + rng.gen_range(0.0..0.4) + rarity.power_bonus();
    let power = round_to(power.clamp(0.8, 1.5), 2);

    let mut item = Item {
        id: ids.next_id(),
        name: String::new(),
        kind: ItemKind::Armor,
        slot,
        rarity,
        set_name: None,
        base_damage: 0.0,
        base_attack_speed: 0.0,
        base_range: 0.0,
        power,
        quality,
        base_stat: None,
        scaling: Scaling::default(),
        affixes: Vec::new(),
        color: rarity.color().to_string(),
        price: 0,
    };

    if slot == EquipSlot::MainHand {
        let kind = WeaponKind::ALL[rng.gen_range(0..WeaponKind::ALL.len())];
        item.kind = ItemKind::Weapon(kind);
        item.name = format!("{} {}", rarity.weapon_prefix(), kind.noun());
        item.base_damage = 10.0 + 2.0 * level as f32;
        item.base_attack_speed = kind.base_attack_speed();
        item.base_range = kind.base_range();
        item.scaling = kind.scaling(rarity.primary_grade());
    } else {
        item.kind = if EquipSlot::ACCESSORY.contains(&slot) {
            ItemKind::Accessory
        } else {
            ItemKind::Armor
        };
        item.name = format!("{} {}", set.name, slot.item_noun());
        item.set_name = Some(set.name.to_string());
        item.color = set.color_for(rarity).to_string();
        let value =
            (slot.stat_multiplier() * quality * power * (1.0 + level as f32 * 0.1)).ceil();
        item.base_stat = Some(StatBonus {
            stat: set.base_stat,
            value: value as u32,
        });
    }

    for _ in 0..rarity.affix_count() {
        let stat = StatType::ALL[rng.gen_range(0..StatType::ALL.len())];
        let value = (quality * (1.0 + rng.gen_range(0.0..2.0))).ceil() as u32;
        item.affixes.push(StatBonus { stat, value });
    }

    let base = if item.base_damage > 0.0 {
        item.base_damage
    } else {
        10.0
    };
    item.price =
        (base * power * quality * 10.0 * (1 + item.affixes.len()) as f32).floor() as u64;

    item
}
