//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Dungeon generation: any seed → walled border, connected floor
//! - Collision: resolved circles never overlap a wall cell
//! - Loot: quality and power stay inside their documented ranges
//! - Player: hp stays in [0, max_hp], inventory never exceeds capacity
//! - Projectiles: every shot finishes within its lifetime

use std::collections::VecDeque;

use bevy::math::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crawler_core::combat::projectile::{advance, PlayerTarget, Projectile};
use crawler_core::constants::{ARROW_LIFETIME, INVENTORY_CAPACITY};
use crawler_core::generation::grid::{Tile, TileGrid};
use crawler_core::generation::{generate_dungeon, DungeonMap, Rank, Theme};
use crawler_core::geometry::resolve_wall_collision;
use crawler_core::loot::{generate_boss_loot, generate_loot, EquipSlot, ItemKind, StatType};
use crawler_core::monster::{BossId, Enemy};
use crawler_core::player::stats::recalculate_player_stats;
use crawler_core::player::Player;
use crawler_core::world::{GameWorld, IdAllocator};

const TS: f32 = 64.0;

fn theme_strategy() -> impl Strategy<Value = Theme> {
    prop_oneof![Just(Theme::Cave), Just(Theme::Desert), Just(Theme::Forest)]
}

fn rank_strategy() -> impl Strategy<Value = Rank> {
    (0usize..Rank::ALL.len()).prop_map(Rank::from_index)
}

fn reachable_floor(map: &DungeonMap) -> usize {
    let tiles = &map.tiles;
    let (sx, sy) = TileGrid::cell_at(map.start_pos, TS);
    let mut seen = vec![false; tiles.width() * tiles.height()];
    let mut queue = VecDeque::from([(sx, sy)]);
    let mut count = 0;
    while let Some((x, y)) = queue.pop_front() {
        if tiles.is_wall(x, y) {
            continue;
        }
        let idx = y as usize * tiles.width() + x as usize;
        if seen[idx] {
            continue;
        }
        seen[idx] = true;
        count += 1;
        queue.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }
    count
}

// ============================================================
// Dungeon Generation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_any_seed_generates_walled_connected_dungeon(
        seed in any::<u64>(),
        theme in theme_strategy(),
        rank in rank_strategy(),
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let map = generate_dungeon(theme, rank, 64, TS, &mut rng);
        let (w, h) = (map.tiles.width() as i64, map.tiles.height() as i64);

        for x in 0..w {
            prop_assert!(map.tiles.is_wall(x, 0), "open top border at x={x}");
            prop_assert!(map.tiles.is_wall(x, h - 1), "open bottom border at x={x}");
        }
        for y in 0..h {
            prop_assert!(map.tiles.is_wall(0, y), "open left border at y={y}");
            prop_assert!(map.tiles.is_wall(w - 1, y), "open right border at y={y}");
        }

        prop_assert!(!map.rooms.is_empty());
        prop_assert!(!map.tiles.is_wall_at(map.start_pos, TS));
        prop_assert!(!map.tiles.is_wall_at(map.boss_pos, TS));
        prop_assert_eq!(reachable_floor(&map), map.tiles.count(Tile::Floor));
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>(), theme in theme_strategy()) {
        let a = generate_dungeon(
            theme, Rank::D, 64, TS, &mut Xoshiro256PlusPlus::seed_from_u64(seed),
        );
        let b = generate_dungeon(
            theme, Rank::D, 64, TS, &mut Xoshiro256PlusPlus::seed_from_u64(seed),
        );
        prop_assert_eq!(a.rooms, b.rooms);
        prop_assert_eq!(a.start_pos, b.start_pos);
        prop_assert_eq!(a.boss_pos, b.boss_pos);
    }
}

// ============================================================
// Collision Properties
// ============================================================

fn walled_room(cells: usize) -> TileGrid {
    let mut grid = TileGrid::filled(cells, cells, Tile::Wall);
    for y in 1..cells - 1 {
        for x in 1..cells - 1 {
            grid.set(x, y, Tile::Floor);
        }
    }
    grid
}

fn rect_distance(pos: Vec2, cell_x: i64, cell_y: i64) -> f32 {
    let min = Vec2::new(cell_x as f32, cell_y as f32) * TS;
    let max = min + Vec2::splat(TS);
    pos.distance(pos.clamp(min, max))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_resolved_circle_clears_walls(
        x in 64.5f32..447.5,
        y in 64.5f32..447.5,
        radius in 4.0f32..24.0,
    ) {
        // 8x8 grid: floor spans [64, 448) on both axes
        let grid = walled_room(8);
        let mut pos = Vec2::new(x, y);
        resolve_wall_collision(&mut pos, radius, &grid, TS);

        for cy in 0..8i64 {
            for cx in 0..8i64 {
                if grid.is_wall(cx, cy) {
                    prop_assert!(
                        rect_distance(pos, cx, cy) >= radius - 0.01,
                        "circle at {pos:?} r={radius} still overlaps cell ({cx}, {cy})"
                    );
                }
            }
        }
    }
}

// ============================================================
// Loot Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_loot_values_in_range(seed in any::<u64>(), level in 1u32..50) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let item = generate_loot(Vec2::ZERO, level, &mut ids, &mut rng).item;

        prop_assert!((0.5..=5.0).contains(&item.quality), "quality {}", item.quality);
        prop_assert!((0.8..=1.5).contains(&item.power), "power {}", item.power);
        prop_assert_eq!(item.affixes.len(), item.rarity.affix_count());
        match item.kind {
            ItemKind::Weapon(_) => {
                prop_assert_eq!(item.slot, EquipSlot::MainHand);
                prop_assert!(item.base_damage > 0.0);
            }
            _ => {
                prop_assert!(item.set_name.is_some());
                prop_assert!(item.base_stat.is_some());
            }
        }
    }

    #[test]
    fn prop_boss_loot_is_never_a_weapon(
        seed in any::<u64>(),
        rank in rank_strategy(),
        boss in prop_oneof![Just(BossId::Kargal), Just(BossId::Xerath), Just(BossId::Elara)],
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let item = generate_boss_loot(Vec2::ZERO, 5, boss, rank, &mut ids, &mut rng).item;
        prop_assert!(item.weapon_kind().is_none());
        prop_assert!(item.set_name.is_some());
    }
}

// ============================================================
// Player Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_hp_stays_in_bounds(hits in prop::collection::vec(0.0f32..60.0, 0..20)) {
        let mut player = Player::new(1, 2);
        let mut died = false;
        for hit in hits {
            player.apply_damage(hit);
            prop_assert!(player.hp >= 0.0 && player.hp <= player.max_hp);
            died |= player.hp <= 0.0;
            prop_assert_eq!(player.is_dead, died);
        }
    }

    #[test]
    fn prop_recalculation_is_idempotent(
        points in prop::collection::vec(0usize..StatType::ALL.len(), 0..30),
    ) {
        let mut player = Player::new(1, 2);
        player.attribute_points = points.len() as u32;
        for index in points {
            player.upgrade_attribute(StatType::ALL[index]).unwrap();
        }
        let (max_hp, damage, speed) = (player.max_hp, player.damage, player.attack_speed);
        recalculate_player_stats(&mut player);
        prop_assert_eq!(player.max_hp, max_hp);
        prop_assert_eq!(player.damage, damage);
        prop_assert_eq!(player.attack_speed, speed);
        prop_assert!(player.hp <= player.max_hp);
    }

    #[test]
    fn prop_inventory_never_exceeds_capacity(ops in prop::collection::vec(0u8..4, 1..60)) {
        let mut world = GameWorld::with_seed(3);
        world.score = u64::MAX / 2;
        for op in ops {
            match op {
                0 => {
                    let _ = world.buy(0);
                }
                1 => {
                    let _ = world.unequip(EquipSlot::MainHand);
                }
                2 => {
                    if let Some(id) = world.player.inventory.first().map(|i| i.id) {
                        let _ = world.equip_from_inventory(id, None);
                    }
                }
                _ => {
                    if let Some(id) = world.player.inventory.last().map(|i| i.id) {
                        let _ = world.drop_item(id);
                    }
                }
            }
            prop_assert!(world.player.inventory.len() <= INVENTORY_CAPACITY);
        }
    }
}

// ============================================================
// Projectile Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_projectile_finishes_within_lifetime(
        angle in 0.0f32..std::f32::consts::TAU,
        dt in 0.005f32..0.1,
    ) {
        let grid = walled_room(40);
        let origin = Vec2::splat(20.0 * TS);
        let mut arrow = Projectile::arrow(1, origin, angle, 10.0);
        let player = PlayerTarget {
            pos: Vec2::new(-1000.0, -1000.0),
            radius: 16.0,
            is_dodging: false,
        };
        let mut enemies: Vec<Enemy> = Vec::new();
        let max_steps = (ARROW_LIFETIME / dt).ceil() as usize + 1;
        let mut done = false;
        for _ in 0..max_steps {
            if advance(&mut arrow, dt, &grid, TS, &mut enemies, player).is_done() {
                done = true;
                break;
            }
        }
        prop_assert!(done, "arrow still flying after {max_steps} steps");
    }
}
