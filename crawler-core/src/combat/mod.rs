//! Player attack resolution.
//!
//! The functions here only decide who gets hit and apply the damage. Floating
//! numbers, particles and cooldowns are handled by the world tick.

use bevy::math::Vec2;

use crate::constants::SWORD_BASE_CONE;
use crate::geometry::{angle_between, direction, normalize_angle};
use crate::monster::{AiState, Enemy};
use crate::player::stats::CombatStats;

pub mod projectile;

/// Damage landed on one enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub pos: Vec2,
    pub damage: f32,
    pub shielded: bool,
}

/// Apply player damage to an enemy after the shield modifier.
///
/// Standard enemies that get hit start chasing; bosses keep their script.
/// Returns the damage actually dealt.
pub fn strike(enemy: &mut Enemy, raw: f32) -> f32 {
    let dealt = enemy.mitigate(raw);
    enemy.hp -= dealt;
    if !enemy.is_boss() {
        enemy.state = AiState::Chase;
    }
    dealt
}

fn hit(enemies: &mut [Enemy], index: usize, raw: f32) -> Hit {
    let enemy = &mut enemies[index];
    let damage = strike(enemy, raw);
    Hit {
        index,
        pos: enemy.pos,
        damage,
        shielded: enemy.has_shield,
    }
}

/// Full cone angle of a sword swing
pub fn sword_cone(stats: &CombatStats) -> f32 {
    SWORD_BASE_CONE + stats.bonus_arc
}

/// Melee cone in front of the player
pub fn sword_sweep(
    origin: Vec2,
    facing: f32,
    stats: &CombatStats,
    enemies: &mut [Enemy],
) -> Vec<Hit> {
    let half_cone = sword_cone(stats) / 2.0;
    let targets: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_dead && !e.is_burrowed())
        .filter(|(_, e)| origin.distance(e.pos) < stats.range + e.radius)
        .filter(|(_, e)| normalize_angle(angle_between(origin, e.pos) - facing).abs() < half_cone)
        .map(|(i, _)| i)
        .collect();

    targets
        .into_iter()
        .map(|i| hit(enemies, i, stats.damage))
        .collect()
}

/// Staff impact point: toward the cursor, no further than `range`
pub fn staff_target(origin: Vec2, cursor_world: Vec2, range: f32) -> Vec2 {
    let reach = origin.distance(cursor_world).min(range);
    origin + direction(angle_between(origin, cursor_world)) * reach
}

/// Area blast centred on `target`
pub fn staff_blast(target: Vec2, stats: &CombatStats, enemies: &mut [Enemy]) -> Vec<Hit> {
    let targets: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_dead && !e.is_burrowed())
        .filter(|(_, e)| target.distance(e.pos) < stats.aoe_radius + e.radius)
        .map(|(i, _)| i)
        .collect();

    targets
        .into_iter()
        .map(|i| hit(enemies, i, stats.damage))
        .collect()
}
