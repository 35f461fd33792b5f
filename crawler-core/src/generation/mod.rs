//! Procedural dungeon generation.
//!
//! Rooms are placed at random inside a WALL-filled grid and rejected when they
//! overlap an earlier room. Every accepted room is chained to the previous one
//! with an L-shaped corridor, so the floor is connected in placement order.
//! The last placement attempt goes to an oversized boss arena.

pub mod grid;
pub mod missions;

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::BASE_GRID_CELLS;
use crate::logging::stage_span;
use grid::{Room, Tile, TileGrid};

/// Dungeon biome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Cave,
    Desert,
    Forest,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Cave, Theme::Desert, Theme::Forest];

    pub fn profile(&self) -> ThemeProfile {
        match self {
            // many small/medium rooms
            Theme::Cave => ThemeProfile {
                min_room: 5,
                max_room: 10,
                max_rooms: 20,
                corridor_width: 1,
            },
            // few huge rooms, wide passages
            Theme::Desert => ThemeProfile {
                min_room: 12,
                max_room: 20,
                max_rooms: 8,
                corridor_width: 3,
            },
            Theme::Forest => ThemeProfile {
                min_room: 6,
                max_room: 15,
                max_rooms: 14,
                corridor_width: 2,
            },
        }
    }
}

/// Room sizing rules per theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeProfile {
    pub min_room: usize,
    pub max_room: usize,
    /// Placement attempts, including the final boss-room attempt
    pub max_rooms: usize,
    pub corridor_width: usize,
}

/// Gate difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    pub const ALL: [Rank; 6] = [Rank::E, Rank::D, Rank::C, Rank::B, Rank::A, Rank::S];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn letter(&self) -> char {
        match self {
            Rank::E => 'E',
            Rank::D => 'D',
            Rank::C => 'C',
            Rank::B => 'B',
            Rank::A => 'A',
            Rank::S => 'S',
        }
    }

    /// Grid size multiplier; larger ranks generate larger maps
    pub fn size_mult(&self) -> f32 {
        match self {
            Rank::E => 1.0,
            Rank::D => 1.2,
            Rank::C => 1.4,
            Rank::B => 1.6,
            Rank::A => 1.8,
            Rank::S => 2.2,
        }
    }
}

/// Clearance between rooms, in cells
const ROOM_PADDING: usize = 1;
/// Extra cells per side for the boss arena over the theme maximum
const BOSS_ROOM_BONUS: usize = 6;
/// Position rolls for the boss arena on the final attempt
const BOSS_ROOM_TRIES: usize = 30;
/// Edge of the emergency room when nothing could be placed
const FALLBACK_ROOM: usize = 12;

/// Result of generating one dungeon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonMap {
    pub tiles: TileGrid,
    pub rooms: Vec<Room>,
    pub boss_room: Room,
    pub start_pos: Vec2,
    pub boss_pos: Vec2,
    /// Pixel dimensions of the grid
    pub width: f32,
    pub height: f32,
}

/// Generate a dungeon for a theme and rank on a `grid_cells`-sized base grid.
pub fn generate_dungeon<R: Rng + ?Sized>(
    theme: Theme,
    rank: Rank,
    base_grid_cells: usize,
    tile_size: f32,
    rng: &mut R,
) -> DungeonMap {
    let _stage = stage_span("generate_dungeon");
    let profile = theme.profile();
    let cells = ((base_grid_cells as f32) * rank.size_mult()).round() as usize;
    // Boss arena plus border must always fit
    let cells = cells.max(profile.max_room + BOSS_ROOM_BONUS + 4);
    let (width, height) = (cells, cells);

    let mut tiles = TileGrid::filled(width, height, Tile::Wall);
    let mut rooms: Vec<Room> = Vec::new();
    let mut boss_room: Option<Room> = None;

    for attempt in 0..profile.max_rooms {
        let is_boss_attempt = attempt + 1 == profile.max_rooms;
        let candidate = if is_boss_attempt {
            let size = profile.max_room + BOSS_ROOM_BONUS;
            (0..BOSS_ROOM_TRIES)
                .map(|_| random_room(size, size, width, height, rng))
                .find(|room| !rooms.iter().any(|other| room.overlaps(other, ROOM_PADDING)))
        } else {
            let w = rng.gen_range(profile.min_room..=profile.max_room);
            let h = rng.gen_range(profile.min_room..=profile.max_room);
            let room = random_room(w, h, width, height, rng);
            (!rooms.iter().any(|other| room.overlaps(other, ROOM_PADDING))).then_some(room)
        };

        let Some(room) = candidate else {
            continue;
        };

        carve_room(&mut tiles, &room);
        if let Some(prev) = rooms.last() {
            let horizontal_first = rng.gen_bool(0.5);
            carve_corridor(
                &mut tiles,
                prev.center_cell(),
                room.center_cell(),
                profile.corridor_width,
                horizontal_first,
            );
        }
        if is_boss_attempt {
            boss_room = Some(room);
        }
        rooms.push(room);
    }

    if rooms.is_empty() {
        let size = FALLBACK_ROOM.min(width.saturating_sub(2)).max(1);
        let room = Room::new((width - size) / 2, (height - size) / 2, size, size);
        carve_room(&mut tiles, &room);
        rooms.push(room);
        debug!(?theme, ?rank, "no rooms accepted, carved fallback room");
    }

    // The last accepted room hosts the boss when the arena did not fit
    let boss_room = boss_room.unwrap_or(rooms[rooms.len() - 1]);
    let start_pos = rooms[0].center_px(tile_size);
    let boss_pos = boss_room.center_px(tile_size);

    debug!(
        ?theme,
        ?rank,
        rooms = rooms.len(),
        cells,
        "dungeon generated"
    );

    DungeonMap {
        tiles,
        rooms,
        boss_room,
        start_pos,
        boss_pos,
        width: width as f32 * tile_size,
        height: height as f32 * tile_size,
    }
}

/// Generate with the default base grid size
pub fn generate_default<R: Rng + ?Sized>(
    theme: Theme,
    rank: Rank,
    tile_size: f32,
    rng: &mut R,
) -> DungeonMap {
    generate_dungeon(theme, rank, BASE_GRID_CELLS, tile_size, rng)
}

fn random_room<R: Rng + ?Sized>(
    w: usize,
    h: usize,
    grid_w: usize,
    grid_h: usize,
    rng: &mut R,
) -> Room {
    // keep one wall cell on every border
    let max_x = grid_w.saturating_sub(w + 1).max(1);
    let max_y = grid_h.saturating_sub(h + 1).max(1);
    let x = rng.gen_range(1..=max_x);
    let y = rng.gen_range(1..=max_y);
    Room::new(x, y, w, h)
}

fn carve_room(tiles: &mut TileGrid, room: &Room) {
    let max_x = tiles.width().saturating_sub(1);
    let max_y = tiles.height().saturating_sub(1);
    for y in room.y..(room.y + room.h).min(max_y) {
        for x in room.x..(room.x + room.w).min(max_x) {
            tiles.set(x, y, Tile::Floor);
        }
    }
}

/// Carve an L-shaped corridor between two cells, `width` cells thick
fn carve_corridor(
    tiles: &mut TileGrid,
    from: (usize, usize),
    to: (usize, usize),
    width: usize,
    horizontal_first: bool,
) {
    let corner = if horizontal_first {
        (to.0, from.1)
    } else {
        (from.0, to.1)
    };
    carve_segment(tiles, from, corner, width);
    carve_segment(tiles, corner, to, width);
}

fn carve_segment(tiles: &mut TileGrid, a: (usize, usize), b: (usize, usize), width: usize) {
    let width = width.max(1) as i64;
    let lo = -(width / 2);
    let hi = (width - 1) / 2;
    let (x0, x1) = (a.0.min(b.0) as i64, a.0.max(b.0) as i64);
    let (y0, y1) = (a.1.min(b.1) as i64, a.1.max(b.1) as i64);
    let max_x = tiles.width() as i64 - 2;
    let max_y = tiles.height() as i64 - 2;

    for y in (y0 + lo)..=(y1 + hi) {
        for x in (x0 + lo)..=(x1 + hi) {
            if x >= 1 && y >= 1 && x <= max_x && y <= max_y {
                tiles.set(x as usize, y as usize, Tile::Floor);
            }
        }
    }
}
