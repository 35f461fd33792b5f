//! Tile grid and room rectangles shared by generation, physics and the arena.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Tile types in a dungeon layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    /// Reserved by the layout format, never generated
    Door,
}

impl Tile {
    pub fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }
}

/// Row-major 2D tile array. Reads outside the grid return `Tile::Wall`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i64, y: i64) -> Tile {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize]
        } else {
            Tile::Wall
        }
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = tile;
        }
    }

    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        self.get(x, y).is_wall()
    }

    /// Cell coordinates containing a world-space point
    pub fn cell_at(pos: Vec2, tile_size: f32) -> (i64, i64) {
        (
            (pos.x / tile_size).floor() as i64,
            (pos.y / tile_size).floor() as i64,
        )
    }

    pub fn is_wall_at(&self, pos: Vec2, tile_size: f32) -> bool {
        let (x, y) = Self::cell_at(pos, tile_size);
        self.is_wall(x, y)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|t| **t == tile).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Pixel extent of the whole grid
    pub fn pixel_size(&self, tile_size: f32) -> Vec2 {
        Vec2::new(
            self.width as f32 * tile_size,
            self.height as f32 * tile_size,
        )
    }
}

/// Axis-aligned room rectangle in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Room {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// Integer centre cell (used for corridor endpoints)
    pub fn center_cell(&self) -> (usize, usize) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Exact centre in world pixels
    pub fn center_px(&self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.x as f32 + self.w as f32 / 2.0) * tile_size,
            (self.y as f32 + self.h as f32 / 2.0) * tile_size,
        )
    }

    /// Overlap test with `padding` cells of clearance on every side
    pub fn overlaps(&self, other: &Room, padding: usize) -> bool {
        self.x < other.x + other.w + padding
            && self.x + self.w + padding > other.x
            && self.y < other.y + other.h + padding
            && self.y + self.h + padding > other.y
    }

    pub fn contains_cell(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// Cells on the rectangle's one-cell-thick perimeter
    pub fn perimeter(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(2 * (self.w + self.h));
        if self.w == 0 || self.h == 0 {
            return cells;
        }
        let right = self.x + self.w - 1;
        let bottom = self.y + self.h - 1;
        for x in self.x..=right {
            cells.push((x, self.y));
            if bottom != self.y {
                cells.push((x, bottom));
            }
        }
        for y in (self.y + 1)..bottom {
            cells.push((self.x, y));
            if right != self.x {
                cells.push((right, y));
            }
        }
        cells
    }

    /// Pixel bounds `(min, max)` shrunk by `margin` pixels on every side
    pub fn inner_bounds_px(&self, tile_size: f32, margin: f32) -> (Vec2, Vec2) {
        let min = Vec2::new(self.x as f32, self.y as f32) * tile_size + Vec2::splat(margin);
        let max = Vec2::new((self.x + self.w) as f32, (self.y + self.h) as f32) * tile_size
            - Vec2::splat(margin);
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_as_wall() {
        let grid = TileGrid::filled(4, 4, Tile::Floor);
        assert_eq!(grid.get(-1, 0), Tile::Wall);
        assert_eq!(grid.get(0, 4), Tile::Wall);
        assert_eq!(grid.get(3, 3), Tile::Floor);
    }

    #[test]
    fn test_room_overlap_padding() {
        let a = Room::new(2, 2, 4, 4);
        let b = Room::new(6, 2, 4, 4);
        assert!(!a.overlaps(&b, 0), "Touching rooms do not overlap");
        assert!(a.overlaps(&b, 1), "Padding makes touching rooms collide");
    }

    #[test]
    fn test_perimeter_count() {
        let room = Room::new(1, 1, 5, 4);
        let cells = room.perimeter();
        assert_eq!(cells.len(), 2 * 5 + 2 * 2);
        assert!(cells.iter().all(|&(x, y)| room.contains_cell(x, y)));
    }
}
