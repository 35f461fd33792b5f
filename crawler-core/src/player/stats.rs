//! Derived player stats: effective attributes, weapon stats and max hp.

use serde::{Deserialize, Serialize};

use super::{Attributes, Player};
use crate::constants::{
    HP_BASE, HP_PER_VITALITY, UNARMED_ATTACK_SPEED, UNARMED_DAMAGE, UNARMED_RANGE,
};
use crate::loot::WeaponKind;

/// Per-tick combat numbers derived from the weapon and attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: f32,
    pub range: f32,
    pub attack_speed: f32,
    /// Extra sword cone width in radians
    pub bonus_arc: f32,
    /// Staff blast radius
    pub aoe_radius: f32,
}

impl CombatStats {
    pub const UNARMED: CombatStats = CombatStats {
        damage: UNARMED_DAMAGE,
        range: UNARMED_RANGE,
        attack_speed: UNARMED_ATTACK_SPEED,
        bonus_arc: 0.0,
        aoe_radius: 0.0,
    };
}

/// Base attributes plus every equipped item's fixed bonus and affixes
pub fn effective_attributes(player: &Player) -> Attributes {
    let mut attrs = player.attributes;
    for (_, item) in player.equipment.iter() {
        for bonus in item.bonuses() {
            attrs.add(bonus);
        }
    }
    attrs
}

pub fn calculate_weapon_stats(player: &Player) -> CombatStats {
    let Some(weapon) = player.equipment.main_hand() else {
        return CombatStats::UNARMED;
    };
    let attrs = effective_attributes(player);

    let str_factor = weapon.scaling.strength.factor();
    let agi_factor = weapon.scaling.agility.factor();
    let int_factor = weapon.scaling.intelligence.factor();
    let strength = attrs.strength as f32;
    let agility = attrs.agility as f32;
    let intelligence = attrs.intelligence as f32;

    let damage = weapon.base_damage * weapon.power
        + strength * str_factor
        + agility * agi_factor
        + intelligence * int_factor;

    let mut range = weapon.base_range;
    let mut bonus_arc = 0.0;
    let mut aoe_radius = 0.0;
    match weapon.weapon_kind() {
        Some(WeaponKind::Sword) => {
            range += strength * str_factor * 2.0;
            bonus_arc = strength * str_factor * 0.01;
        }
        Some(WeaponKind::Bow) => {
            range += agility * agi_factor * 10.0;
        }
        Some(WeaponKind::Staff) => {
            aoe_radius = 60.0 + intelligence * int_factor * 4.0;
        }
        None => {}
    }

    let attack_speed = weapon.base_attack_speed * (1.0 + attrs.perception as f32 * 0.01);

    CombatStats {
        damage,
        range,
        attack_speed,
        bonus_arc,
        aoe_radius,
    }
}

/// Refresh max hp and the cached combat numbers.
///
/// Current hp is only ever capped to the new maximum, never healed.
pub fn recalculate_player_stats(player: &mut Player) {
    let attrs = effective_attributes(player);
    player.max_hp = HP_BASE + attrs.vitality as f32 * HP_PER_VITALITY;
    player.hp = player.hp.min(player.max_hp);

    let combat = calculate_weapon_stats(player);
    player.damage = combat.damage;
    player.attack_speed = combat.attack_speed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::shop::shop_catalog;
    use crate::loot::EquipSlot;

    #[test]
    fn test_unarmed_fallback_is_exact() {
        let mut player = Player::new(1, 2);
        player.equipment.take(EquipSlot::MainHand);
        let stats = calculate_weapon_stats(&player);
        assert_eq!(stats, CombatStats::UNARMED);
        assert_eq!(stats.damage, 5.0);
        assert_eq!(stats.range, 50.0);
        assert_eq!(stats.attack_speed, 1.0);
    }

    #[test]
    fn test_starting_weapon_stats() {
        let player = Player::new(1, 2);
        let stats = calculate_weapon_stats(&player);
        // 12 * 1.0 + 5 * 1.0 (str C) + 5 * 0.75 (agi D)
        assert!((stats.damage - 20.75).abs() < 1e-4, "damage {}", stats.damage);
        // 140 + 5 * 1.0 * 2
        assert!((stats.range - 150.0).abs() < 1e-4);
        assert!((stats.bonus_arc - 0.05).abs() < 1e-6);
        assert!((stats.attack_speed - 1.5 * 1.05).abs() < 1e-5);
        assert_eq!(stats.aoe_radius, 0.0);
    }

    #[test]
    fn test_effective_attributes_include_bonuses() {
        let mut player = Player::new(1, 2);
        let plate = shop_catalog().remove(2);
        player.equipment.replace(EquipSlot::Chest, plate);
        let attrs = effective_attributes(&player);
        assert_eq!(attrs.strength, 15);
        assert_eq!(attrs.vitality, 10);
        assert_eq!(player.attributes.strength, 5, "base attributes untouched");
    }

    #[test]
    fn test_recalculate_caps_but_never_heals() {
        let mut player = Player::new(1, 2);
        let plate = shop_catalog().remove(2);
        player.equipment.replace(EquipSlot::Chest, plate);
        recalculate_player_stats(&mut player);
        assert!((player.max_hp - 125.0).abs() < f32::EPSILON);
        assert!((player.hp - 100.0).abs() < f32::EPSILON);

        player.hp = 125.0;
        player.equipment.take(EquipSlot::Chest);
        recalculate_player_stats(&mut player);
        assert!((player.hp - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut player = Player::new(1, 2);
        recalculate_player_stats(&mut player);
        let first = (player.max_hp, player.damage, player.attack_speed);
        recalculate_player_stats(&mut player);
        assert_eq!(first, (player.max_hp, player.damage, player.attack_speed));
    }
}
