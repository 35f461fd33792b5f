//! Boss arena: engaging the boss seals the room behind the player.

use bevy::math::Vec2;
use rand::Rng;
use tracing::info;

use super::{GameEvent, GameWorld};
use crate::constants::ARENA_MARGIN_TILES;
use crate::generation::grid::{Room, Tile, TileGrid};

const SEAL_COLOR: &str = "#ef4444";
const SEAL_PARTICLES: usize = 20;

/// Turn every floor cell on the room's perimeter into wall.
/// Returns how many cells changed.
pub fn seal_room(tiles: &mut TileGrid, room: &Room) -> usize {
    let mut sealed = 0;
    for (x, y) in room.perimeter() {
        if tiles.get(x as i64, y as i64) == Tile::Floor {
            tiles.set(x, y, Tile::Wall);
            sealed += 1;
        }
    }
    sealed
}

/// Strictly inside the room's pixel bounds shrunk by the arena margin
pub fn inside_arena(room: &Room, tile_size: f32, pos: Vec2) -> bool {
    let (min, max) = room.inner_bounds_px(tile_size, tile_size * ARENA_MARGIN_TILES);
    pos.x > min.x && pos.x < max.x && pos.y > min.y && pos.y < max.y
}

impl GameWorld {
    /// Engage the boss and seal the arena once the player is well inside.
    ///
    /// Returns true only on the tick the seal happens.
    pub fn check_arena_seal(&mut self) -> bool {
        let Some(room) = self.boss_room else {
            return false;
        };
        let Some(boss) = self
            .enemies
            .iter_mut()
            .find(|e| e.is_boss() && !e.is_dead && e.hp > 0.0)
        else {
            return false;
        };
        if boss.engaged || !inside_arena(&room, self.tile_size, self.player.pos) {
            return false;
        }

        boss.engaged = true;
        let name = boss.name.clone();
        let sealed = seal_room(&mut self.tiles, &room);
        info!(boss = %name, sealed, "arena sealed");

        let text_pos = self.player.pos - Vec2::new(0.0, 100.0);
        self.push_text(text_pos, "ARENA SEALED", SEAL_COLOR, 3.0, -10.0);

        let (min, max) = room.inner_bounds_px(self.tile_size, self.tile_size * ARENA_MARGIN_TILES);
        for _ in 0..SEAL_PARTICLES {
            let pos = Vec2::new(
                self.rng.gen_range(min.x..=max.x),
                self.rng.gen_range(min.y..=max.y),
            );
            self.spawn_particle(pos, Vec2::ZERO, 1.0, SEAL_COLOR, 5.0);
        }

        self.emit(GameEvent::ArenaSealed);
        self.emit(GameEvent::BossEngaged { name });
        true
    }
}
