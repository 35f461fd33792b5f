//! Fixed shop catalog and the starting weapon.

use super::{EquipSlot, Item, ItemKind, Rarity, Scaling, ScalingGrade, StatBonus, StatType, WeaponKind};

/// Every new or restarted player starts with this in MAIN_HAND
pub fn starting_weapon(id: u64) -> Item {
    Item {
        id,
        name: "Hunter's Dagger".to_string(),
        kind: ItemKind::Weapon(WeaponKind::Sword),
        slot: EquipSlot::MainHand,
        rarity: Rarity::Common,
        set_name: None,
        base_damage: 12.0,
        base_attack_speed: 1.5,
        base_range: 140.0,
        power: 1.0,
        quality: 1.0,
        base_stat: None,
        scaling: Scaling {
            strength: ScalingGrade::C,
            agility: ScalingGrade::D,
            intelligence: ScalingGrade::None,
        },
        affixes: Vec::new(),
        color: "#cbd5e1".to_string(),
        price: 0,
    }
}

/// Catalog templates. Purchases are copies with a freshly allocated id.
pub fn shop_catalog() -> Vec<Item> {
    vec![
        Item {
            id: 0,
            name: "Training Sword".to_string(),
            kind: ItemKind::Weapon(WeaponKind::Sword),
            slot: EquipSlot::MainHand,
            rarity: Rarity::Common,
            set_name: None,
            base_damage: 10.0,
            base_attack_speed: 1.3,
            base_range: 130.0,
            power: 0.8,
            quality: 0.5,
            base_stat: None,
            scaling: Scaling {
                strength: ScalingGrade::D,
                ..Scaling::default()
            },
            affixes: Vec::new(),
            color: Rarity::Common.color().to_string(),
            price: 50,
        },
        Item {
            id: 1,
            name: "Knight's Blade".to_string(),
            kind: ItemKind::Weapon(WeaponKind::Sword),
            slot: EquipSlot::MainHand,
            rarity: Rarity::Rare,
            set_name: None,
            base_damage: 25.0,
            base_attack_speed: 1.4,
            base_range: 150.0,
            power: 1.1,
            quality: 2.0,
            base_stat: None,
            scaling: Scaling {
                strength: ScalingGrade::B,
                agility: ScalingGrade::D,
                intelligence: ScalingGrade::None,
            },
            affixes: vec![StatBonus {
                stat: StatType::Strength,
                value: 3,
            }],
            color: Rarity::Rare.color().to_string(),
            price: 1500,
        },
        Item {
            id: 2,
            name: "Warlord's Plate".to_string(),
            kind: ItemKind::Armor,
            slot: EquipSlot::Chest,
            rarity: Rarity::Rare,
            set_name: Some("Warlord".to_string()),
            base_damage: 0.0,
            base_attack_speed: 0.0,
            base_range: 0.0,
            power: 1.0,
            quality: 2.0,
            base_stat: Some(StatBonus {
                stat: StatType::Strength,
                value: 10,
            }),
            scaling: Scaling::default(),
            affixes: vec![StatBonus {
                stat: StatType::Vitality,
                value: 5,
            }],
            color: Rarity::Rare.color().to_string(),
            price: 1200,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let catalog = shop_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].price, 50);
        assert_eq!(catalog[2].slot, EquipSlot::Chest);
        assert_eq!(catalog[2].bonuses().count(), 2);
    }

    #[test]
    fn test_starting_weapon_is_a_sword() {
        let dagger = starting_weapon(7);
        assert_eq!(dagger.id, 7);
        assert_eq!(dagger.weapon_kind(), Some(WeaponKind::Sword));
        assert_eq!(dagger.scaling.strength, ScalingGrade::C);
    }
}
