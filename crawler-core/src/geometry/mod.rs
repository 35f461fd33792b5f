//! Geometry and collision helpers.
//!
//! Everything in the world is a circle: players, enemies, projectiles and
//! orbs. Walls are the WALL cells of the tile grid (plus everything outside it).

use bevy::math::Vec2;

use crate::generation::grid::TileGrid;

/// A circle in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Euclidean distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Circle overlap (strict: touching circles do not collide)
pub fn check_collision(a: Circle, b: Circle) -> bool {
    distance(a.center, b.center) < a.radius + b.radius
}

/// Push a circle out of every wall cell it overlaps.
///
/// Every candidate cell in the circle's bounding box is processed in turn and
/// corrections compound within one call, so concave corners resolve in a
/// single pass but tight corridors can be over-corrected.
pub fn resolve_wall_collision(pos: &mut Vec2, radius: f32, tiles: &TileGrid, tile_size: f32) {
    let min_x = ((pos.x - radius) / tile_size).floor() as i64;
    let max_x = ((pos.x + radius) / tile_size).floor() as i64;
    let min_y = ((pos.y - radius) / tile_size).floor() as i64;
    let max_y = ((pos.y + radius) / tile_size).floor() as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if !tiles.is_wall(x, y) {
                continue;
            }
            let tile_min = Vec2::new(x as f32, y as f32) * tile_size;
            let tile_max = tile_min + Vec2::splat(tile_size);
            let closest = pos.clamp(tile_min, tile_max);

            let delta = *pos - closest;
            let dist_sq = delta.length_squared();
            if dist_sq < radius * radius && dist_sq > 0.0 {
                let dist = dist_sq.sqrt();
                let overlap = radius - dist;
                *pos += delta / dist * overlap;
            }
        }
    }
}

/// Wrap an angle difference into [-PI, PI]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Bearing from `from` to `to` in radians
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::grid::Tile;

    const TS: f32 = 64.0;

    fn open_room() -> TileGrid {
        // 5x5 with a wall border
        let mut grid = TileGrid::filled(5, 5, Tile::Wall);
        for y in 1..4 {
            for x in 1..4 {
                grid.set(x, y, Tile::Floor);
            }
        }
        grid
    }

    #[test]
    fn test_distance_and_collision() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vec2::new(10.0, 0.0), 5.0);
        assert!((distance(a.center, b.center) - 10.0).abs() < f32::EPSILON);
        assert!(!check_collision(a, b), "Touching circles must not collide");

        let c = Circle::new(Vec2::new(9.9, 0.0), 5.0);
        assert!(check_collision(a, c));
    }

    #[test]
    fn test_push_out_of_left_wall() {
        let grid = open_room();
        // 6px into the west wall cell boundary at x = 64
        let mut pos = Vec2::new(TS + 10.0, 2.5 * TS);
        resolve_wall_collision(&mut pos, 16.0, &grid, TS);
        assert!((pos.x - (TS + 16.0)).abs() < 1e-3, "Got {pos:?}");
        assert!((pos.y - 2.5 * TS).abs() < 1e-3);
    }

    #[test]
    fn test_free_position_untouched() {
        let grid = open_room();
        let mut pos = Vec2::new(2.5 * TS, 2.5 * TS);
        resolve_wall_collision(&mut pos, 16.0, &grid, TS);
        assert_eq!(pos, Vec2::new(2.5 * TS, 2.5 * TS));
    }

    #[test]
    fn test_corner_pushes_both_axes() {
        let grid = open_room();
        let mut pos = Vec2::new(TS + 4.0, TS + 4.0);
        resolve_wall_collision(&mut pos, 16.0, &grid, TS);
        assert!(pos.x >= TS + 16.0 - 1e-3);
        assert!(pos.y >= TS + 16.0 - 1e-3);
    }

    #[test]
    fn test_out_of_grid_is_wall() {
        let grid = TileGrid::filled(3, 3, Tile::Floor);
        let mut pos = Vec2::new(4.0, 100.0);
        resolve_wall_collision(&mut pos, 16.0, &grid, TS);
        assert!(pos.x >= 16.0 - 1e-3, "Left edge of grid acts as a wall");
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-4);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-4);
        assert!((normalize_angle(0.25) - 0.25).abs() < f32::EPSILON);
    }
}
