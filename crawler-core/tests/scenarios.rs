//! End-to-end gameplay scenarios driven through `Simulation`.
//!
//! Each test enters a real dungeon, then swaps in a small open arena so
//! positions and distances are exact.

use bevy::math::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crawler_core::combat::projectile::{Owner, Projectile};
use crawler_core::constants::{ARROW_LIFETIME, INVENTORY_CAPACITY};
use crawler_core::error::ActionError;
use crawler_core::gameflow::{GameState, Simulation};
use crawler_core::generation::grid::{Room, Tile, TileGrid};
use crawler_core::input::InputIntent;
use crawler_core::loot::{generate_loot, EquipSlot, ExperienceOrb, Item};
use crawler_core::monster::{template, BossId, Enemy, Species};
use crawler_core::player::stats::{calculate_weapon_stats, CombatStats};
use crawler_core::world::{GameEvent, IdAllocator};

const DT: f32 = 1.0 / 60.0;

/// Dungeon run on an open `cells`x`cells` floor with a wall border.
/// The player stands in the middle and nothing else is alive.
fn open_arena(cells: usize) -> Simulation {
    let mut sim = Simulation::with_seed(21);
    sim.start_mission(0).unwrap();

    let w = sim.world_mut();
    let mut tiles = TileGrid::filled(cells, cells, Tile::Floor);
    for i in 0..cells {
        tiles.set(i, 0, Tile::Wall);
        tiles.set(i, cells - 1, Tile::Wall);
        tiles.set(0, i, Tile::Wall);
        tiles.set(cells - 1, i, Tile::Wall);
    }
    w.tiles = tiles;
    w.width = cells as f32 * w.tile_size;
    w.height = cells as f32 * w.tile_size;
    w.enemies.clear();
    w.items.clear();
    w.xp_orbs.clear();
    w.projectiles.clear();
    w.boss_room = None;
    w.player.pos = Vec2::splat(cells as f32 * w.tile_size / 2.0);
    w.camera = w.player.pos;
    sim.drain_events();
    sim
}

/// Input that faces due east without moving
fn aim_east(sim: &Simulation) -> InputIntent {
    InputIntent {
        pointer: sim.world().screen_center() + Vec2::new(100.0, 0.0),
        ..Default::default()
    }
}

fn armor_piece(seed: u64) -> Item {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut ids = IdAllocator::default();
    loop {
        let item = generate_loot(Vec2::ZERO, 3, &mut ids, &mut rng).item;
        if item.weapon_kind().is_none() && !item.slot.is_ring() {
            return item;
        }
    }
}

#[test]
fn test_xp_batch_levels_player() {
    let mut sim = open_arena(20);
    let pos = sim.world().player.pos;
    for id in 0..10 {
        sim.world_mut().xp_orbs.push(ExperienceOrb {
            id: 500 + id,
            pos,
            vel: Vec2::ZERO,
            value: 10,
            radius: 5.0,
            color: "#00ffff".into(),
        });
    }

    let report = sim.update(DT, &mut InputIntent::default()).unwrap();
    let player = &sim.world().player;
    assert_eq!(report.level_ups, 1);
    assert_eq!(player.level, 2);
    assert_eq!(player.exp, 0);
    assert_eq!(player.attribute_points, 3);
    assert!(sim.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
}

#[test]
fn test_shielded_orc_takes_half_sword_damage() {
    let mut sim = open_arena(20);
    let w = sim.world_mut();
    let mut orc = Enemy::from_template(900, w.player.pos + Vec2::new(60.0, 0.0), &template(Species::Orc));
    orc.attack_timer = 10.0;
    assert!(orc.has_shield);
    assert_eq!(orc.max_hp, 80.0);
    w.enemies.push(orc);

    // a flat 20-damage sword
    w.player.attributes.strength = 0;
    w.player.attributes.agility = 0;
    let mut weapon = w.player.equipment.take(EquipSlot::MainHand).unwrap();
    weapon.base_damage = 20.0;
    weapon.power = 1.0;
    w.player.equipment.replace(EquipSlot::MainHand, weapon);
    assert_eq!(calculate_weapon_stats(&w.player).damage, 20.0);

    let mut input = aim_east(&sim);
    input.attack_held = true;
    sim.update(DT, &mut input);
    assert!((sim.world().enemies[0].hp - 70.0).abs() < 1e-4);
}

#[test]
fn test_dodge_avoids_enemy_projectile() {
    let mut sim = open_arena(20);
    let fireball = |pos: Vec2| Projectile {
        id: 77,
        pos,
        vel: Vec2::ZERO,
        radius: 8.0,
        damage: 15.0,
        owner: Owner::Enemy,
        lifetime: 2.0,
        color: "#f97316".into(),
    };

    let w = sim.world_mut();
    w.player.dodge_duration = 0.25;
    let pos = w.player.pos;
    w.projectiles.push(fireball(pos));
    let hp = w.player.hp;
    sim.update(DT, &mut InputIntent::default());
    assert!(sim.world().player.is_dodging);
    assert_eq!(sim.world().player.hp, hp);
    assert_eq!(sim.world().projectiles.len(), 1, "shot passes through");

    let w = sim.world_mut();
    w.player.dodge_duration = 0.0;
    w.projectiles.clear();
    let pos = w.player.pos;
    w.projectiles.push(fireball(pos));
    sim.update(DT, &mut InputIntent::default());
    assert!(!sim.world().player.is_dodging);
    assert_eq!(sim.world().player.hp, hp - 15.0);
    assert!(sim.world().projectiles.is_empty());
}

#[test]
fn test_mission_requires_weapon() {
    let mut sim = Simulation::with_seed(8);
    let dagger = sim
        .world_mut()
        .player
        .equipment
        .take(EquipSlot::MainHand)
        .unwrap();

    assert_eq!(sim.start_mission(0), Err(ActionError::WeaponRequired));
    assert_eq!(sim.state(), GameState::Menu);
    assert!(sim.drain_events().contains(&GameEvent::WeaponRequired));
    assert!(sim.world().texts.iter().any(|t| t.text == "WEAPON REQUIRED!"));

    sim.world_mut()
        .player
        .equipment
        .replace(EquipSlot::MainHand, dagger);
    assert!(sim.start_mission(0).is_ok());
    assert_eq!(sim.state(), GameState::Dungeon);
}

#[test]
fn test_kargal_seals_arena_once() {
    let mut sim = open_arena(24);
    let room = Room::new(5, 5, 10, 10);
    let w = sim.world_mut();
    let boss_pos = room.center_px(w.tile_size);
    w.boss_room = Some(room);
    w.enemies.push(Enemy::boss(901, boss_pos, BossId::Kargal, 1));
    // inside the room, clear of the 1.5-tile margin
    w.player.pos = Vec2::new(450.0, 450.0);
    w.camera = w.player.pos;

    let report = sim.update(DT, &mut InputIntent::default()).unwrap();
    assert!(report.arena_sealed);
    assert!(sim.world().boss().is_some_and(|b| b.engaged));
    for (x, y) in room.perimeter() {
        assert_eq!(sim.world().tiles.get(x as i64, y as i64), Tile::Wall, "open cell ({x}, {y})");
    }
    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::ArenaSealed));
    assert!(events.contains(&GameEvent::BossEngaged {
        name: sim.world().boss().unwrap().name.clone()
    }));

    let sealed_tiles = sim.world().tiles.clone();
    let texts = sim.world().texts.len();
    assert!(!sim.world_mut().check_arena_seal());
    assert_eq!(sim.world().tiles, sealed_tiles);
    assert_eq!(sim.world().texts.len(), texts);
    assert!(sim.drain_events().is_empty());
}

#[test]
fn test_equip_unequip_round_trip() {
    let mut sim = open_arena(20);
    let armor = armor_piece(5);
    let slot = armor.slot;
    let w = sim.world_mut();
    let before = (w.player.max_hp, calculate_weapon_stats(&w.player));
    w.player.inventory.push(armor.clone());

    assert_eq!(w.equip_from_inventory(armor.id, None), Ok(slot));
    assert!(w.player.inventory.is_empty());
    assert_eq!(w.player.equipment.get(slot), Some(&armor));

    w.unequip(slot).unwrap();
    assert_eq!(w.player.inventory, vec![armor]);
    assert!(!w.player.equipment.is_occupied(slot));
    assert_eq!((w.player.max_hp, calculate_weapon_stats(&w.player)), before);
}

#[test]
fn test_unarmed_fallback_stats() {
    let mut sim = open_arena(20);
    let w = sim.world_mut();
    w.unequip(EquipSlot::MainHand).unwrap();
    assert!(!w.player.has_weapon());
    let stats = calculate_weapon_stats(&w.player);
    assert_eq!(stats, CombatStats::UNARMED);
    assert_eq!((stats.damage, stats.range, stats.attack_speed), (5.0, 50.0, 1.0));

    // unarmed attacks are disabled but the tick keeps running
    let mut input = aim_east(&sim);
    input.attack_held = true;
    assert!(sim.update(DT, &mut input).is_some());
    assert_eq!(sim.world().player.attack_cooldown, 0.0);
}

#[test]
fn test_arrow_expires_after_lifetime() {
    let mut sim = open_arena(60);
    let w = sim.world_mut();
    let origin = w.player.pos;
    w.projectiles.push(Projectile::arrow(300, origin, 0.0, 10.0));
    // out of the arrow's way
    w.player.pos.y += 200.0;

    let mut ticks = 0;
    while !sim.world().projectiles.is_empty() {
        sim.update(DT, &mut InputIntent::default());
        ticks += 1;
        assert!(ticks < 200, "arrow never expired");
    }
    let expected = (ARROW_LIFETIME / DT).round() as i32;
    assert!((ticks - expected).abs() <= 1, "expired after {ticks} ticks");
}

#[test]
fn test_long_run_keeps_player_invariants() {
    let mut sim = Simulation::with_seed(99);
    sim.start_mission(0).unwrap();
    for frame in 0..1200u32 {
        let mut input = InputIntent {
            move_right: frame % 200 < 100,
            move_down: frame % 300 >= 150,
            attack_held: frame % 3 != 0,
            dodge_pressed: frame % 70 == 0,
            pickup_pressed: frame % 20 == 0,
            pointer: sim.world().screen_center() + Vec2::from_angle(frame as f32 * 0.1) * 80.0,
            ..Default::default()
        };
        sim.update(DT, &mut input);

        let player = &sim.world().player;
        assert!(player.hp >= 0.0 && player.hp <= player.max_hp, "hp {} at frame {frame}", player.hp);
        assert!(player.inventory.len() <= INVENTORY_CAPACITY);
        if sim.state() == GameState::Menu {
            sim.start_mission(0).unwrap();
        }
    }
}
