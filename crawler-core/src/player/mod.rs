//! The player character: attributes, equipment, inventory and leveling.
//!
//! Derived values (max hp, cached damage/attack speed) are refreshed by
//! [`stats::recalculate_player_stats`] after any equipment or attribute change.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{
    ATTRIBUTE_POINTS_PER_LEVEL, EXP_PER_LEVEL, INVENTORY_CAPACITY, PLAYER_BASE_HP,
    PLAYER_BASE_MANA, PLAYER_BASE_SPEED, PLAYER_RADIUS, STARTING_ATTRIBUTE,
};
use crate::error::ActionError;
use crate::loot::shop::starting_weapon;
use crate::loot::{EquipSlot, Item, StatBonus, StatType, WeaponKind};

pub mod inventory;
pub mod stats;

/// The five base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub agility: u32,
    pub vitality: u32,
    pub perception: u32,
    pub intelligence: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: STARTING_ATTRIBUTE,
            agility: STARTING_ATTRIBUTE,
            vitality: STARTING_ATTRIBUTE,
            perception: STARTING_ATTRIBUTE,
            intelligence: STARTING_ATTRIBUTE,
        }
    }
}

impl Attributes {
    pub fn get(&self, stat: StatType) -> u32 {
        match stat {
            StatType::Strength => self.strength,
            StatType::Agility => self.agility,
            StatType::Vitality => self.vitality,
            StatType::Perception => self.perception,
            StatType::Intelligence => self.intelligence,
        }
    }

    pub fn get_mut(&mut self, stat: StatType) -> &mut u32 {
        match stat {
            StatType::Strength => &mut self.strength,
            StatType::Agility => &mut self.agility,
            StatType::Vitality => &mut self.vitality,
            StatType::Perception => &mut self.perception,
            StatType::Intelligence => &mut self.intelligence,
        }
    }

    pub fn add(&mut self, bonus: &StatBonus) {
        *self.get_mut(bonus.stat) += bonus.value;
    }
}

/// Ten fixed equipment slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<Item>; 10],
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_occupied(&self, slot: EquipSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Put `item` in `slot`, returning whatever was there
    pub fn replace(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots[slot.index()].replace(item)
    }

    pub fn take(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots[slot.index()].take()
    }

    pub fn main_hand(&self) -> Option<&Item> {
        self.get(EquipSlot::MainHand)
    }

    /// Equipped items with their slots
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        EquipSlot::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(slot, item)| item.as_ref().map(|item| (*slot, item)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub is_dead: bool,

    pub mana: f32,
    pub max_mana: f32,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
    pub level: u32,
    pub exp: u32,
    pub attribute_points: u32,
    pub attributes: Attributes,

    /// Cached for display; attack resolution recomputes every tick
    pub damage: f32,
    pub attack_speed: f32,

    pub is_attacking: bool,
    pub attack_cooldown: f32,
    pub attack_visual_timer: f32,
    pub is_dodging: bool,
    pub dodge_cooldown: f32,
    pub dodge_duration: f32,
    pub facing_angle: f32,
    /// Simulation clock seconds of the last attack, dodge or hit taken
    pub last_combat_time: f64,
    /// Pauses the simulation while set
    pub inventory_open: bool,
}

impl Player {
    /// Fresh level-1 player holding the starting weapon
    pub fn new(id: u64, weapon_id: u64) -> Self {
        let mut player = Self {
            id,
            pos: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            color: "#3b82f6".to_string(),
            hp: PLAYER_BASE_HP,
            max_hp: PLAYER_BASE_HP,
            speed: PLAYER_BASE_SPEED,
            is_dead: false,
            mana: PLAYER_BASE_MANA,
            max_mana: PLAYER_BASE_MANA,
            equipment: Equipment::default(),
            inventory: Vec::new(),
            level: 1,
            exp: 0,
            attribute_points: 0,
            attributes: Attributes::default(),
            damage: 0.0,
            attack_speed: 0.0,
            is_attacking: false,
            attack_cooldown: 0.0,
            attack_visual_timer: 0.0,
            is_dodging: false,
            dodge_cooldown: 0.0,
            dodge_duration: 0.0,
            facing_angle: 0.0,
            last_combat_time: 0.0,
            inventory_open: false,
        };
        player
            .equipment
            .replace(EquipSlot::MainHand, starting_weapon(weapon_id));
        stats::recalculate_player_stats(&mut player);
        player
    }

    pub fn has_weapon(&self) -> bool {
        self.equipment.is_occupied(EquipSlot::MainHand)
    }

    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        self.equipment.main_hand().and_then(Item::weapon_kind)
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= INVENTORY_CAPACITY
    }

    /// Experience needed for the next level
    pub fn exp_to_next(&self) -> u32 {
        self.level * EXP_PER_LEVEL
    }

    /// Add experience; returns true when a level-up happened.
    ///
    /// Reaching the threshold resets exp to zero (overflow is discarded).
    pub fn gain_exp(&mut self, amount: u32) -> bool {
        self.exp += amount;
        if self.exp < self.exp_to_next() {
            return false;
        }
        self.level += 1;
        self.exp = 0;
        self.attribute_points += ATTRIBUTE_POINTS_PER_LEVEL;
        info!(level = self.level, "player leveled up");
        true
    }

    /// Subtract hp, clamped at zero; death is latched once hp reaches zero
    pub fn apply_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
        if self.hp <= 0.0 {
            self.is_dead = true;
        }
    }

    /// Spend one attribute point on `stat`
    pub fn upgrade_attribute(&mut self, stat: StatType) -> Result<(), ActionError> {
        if self.attribute_points == 0 {
            return Err(ActionError::NoAttributePoints);
        }
        self.attribute_points -= 1;
        *self.attributes.get_mut(stat) += 1;
        stats::recalculate_player_stats(self);
        Ok(())
    }
}
