//! Projectile flight and hit detection.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::strike;
use crate::constants::{ARROW_LIFETIME, ARROW_RADIUS, ARROW_SPEED};
use crate::generation::grid::TileGrid;
use crate::geometry::{check_collision, direction, Circle};
use crate::monster::ai::ProjectileSpec;
use crate::monster::Enemy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub owner: Owner,
    /// Seconds left before the projectile fizzles
    pub lifetime: f32,
    pub color: String,
}

impl Projectile {
    pub fn from_spec(id: u64, spec: &ProjectileSpec) -> Self {
        Self {
            id,
            pos: spec.origin,
            vel: direction(spec.angle) * spec.speed,
            radius: spec.radius,
            damage: spec.damage,
            owner: Owner::Enemy,
            lifetime: spec.lifetime,
            color: spec.color.to_string(),
        }
    }

    /// Player bow shot
    pub fn arrow(id: u64, origin: Vec2, angle: f32, damage: f32) -> Self {
        Self {
            id,
            pos: origin,
            vel: direction(angle) * ARROW_SPEED,
            radius: ARROW_RADIUS,
            damage,
            owner: Owner::Player,
            lifetime: ARROW_LIFETIME,
            color: "#3b82f6".to_string(),
        }
    }
}

/// What the player looks like to an enemy projectile
#[derive(Debug, Clone, Copy)]
pub struct PlayerTarget {
    pub pos: Vec2,
    pub radius: f32,
    pub is_dodging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    Flying,
    /// Left the grid or entered a wall cell
    Blocked,
    Expired,
    /// Damage already applied to `enemies[index]`
    HitEnemy { index: usize, damage: f32 },
    /// Damage for the caller to apply to the player
    HitPlayer { damage: f32 },
}

impl Flight {
    pub fn is_done(&self) -> bool {
        !matches!(self, Flight::Flying)
    }
}

/// Advance one projectile by `dt` and resolve what it touched.
///
/// Player shots hit the first non-burrowed enemy they overlap. Enemy shots
/// pass through a dodging player.
pub fn advance(
    p: &mut Projectile,
    dt: f32,
    tiles: &TileGrid,
    tile_size: f32,
    enemies: &mut [Enemy],
    player: PlayerTarget,
) -> Flight {
    p.pos += p.vel * dt;
    p.lifetime -= dt;

    let (cx, cy) = TileGrid::cell_at(p.pos, tile_size);
    if !tiles.in_bounds(cx, cy) || tiles.is_wall(cx, cy) {
        return Flight::Blocked;
    }

    let body = Circle::new(p.pos, p.radius);
    match p.owner {
        Owner::Player => {
            let hit = enemies.iter().position(|e| {
                !e.is_burrowed() && check_collision(body, Circle::new(e.pos, e.radius))
            });
            if let Some(index) = hit {
                let damage = strike(&mut enemies[index], p.damage);
                return Flight::HitEnemy { index, damage };
            }
        }
        Owner::Enemy => {
            if !player.is_dodging && check_collision(body, Circle::new(player.pos, player.radius)) {
                return Flight::HitPlayer { damage: p.damage };
            }
        }
    }

    if p.lifetime <= 0.0 {
        Flight::Expired
    } else {
        Flight::Flying
    }
}
