//! Centralized gameplay constants for the crawler simulation core.
//!
//! Per-module tables (enemy templates, item sets, theme profiles) stay in
//! their modules; everything tuned across systems lives here.

// =====================================================
// World
// =====================================================

/// Edge length of one tile in world pixels
pub const TILE_SIZE: f32 = 64.0;

/// Base grid edge (cells) before the rank size multiplier
pub const BASE_GRID_CELLS: usize = 64;

/// Default viewport used to derive the aiming screen centre
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1024.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 768.0;

/// Upper bound the driver applies to frame dt before calling `update`
pub const MAX_FRAME_DT: f32 = 0.1;

// =====================================================
// Player movement
// =====================================================

pub const PLAYER_RADIUS: f32 = 16.0;
pub const PLAYER_BASE_SPEED: f32 = 240.0;
pub const PLAYER_BASE_HP: f32 = 100.0;
pub const PLAYER_BASE_MANA: f32 = 100.0;

/// Seconds without combat before the sprint bonus kicks in
pub const OUT_OF_COMBAT_DELAY: f64 = 3.0;
pub const SPRINT_MULT: f32 = 1.5;
pub const ATTACK_SLOW: f32 = 0.5;
pub const DODGE_MULT: f32 = 3.0;
pub const DODGE_DURATION: f32 = 0.25;
pub const DODGE_COOLDOWN: f32 = 1.2;

/// Camera follow rates (1/s)
pub const CAMERA_SPEED: f32 = 5.0;
pub const CAMERA_SPEED_SPRINT: f32 = 8.0;

// =====================================================
// Progression
// =====================================================

/// maxHp = HP_BASE + vitality * HP_PER_VITALITY
pub const HP_BASE: f32 = 75.0;
pub const HP_PER_VITALITY: f32 = 5.0;
pub const STARTING_ATTRIBUTE: u32 = 5;
pub const EXP_PER_LEVEL: u32 = 100;
pub const ATTRIBUTE_POINTS_PER_LEVEL: u32 = 3;
pub const INVENTORY_CAPACITY: usize = 20;

// =====================================================
// Combat
// =====================================================

/// Damage multiplier applied to shielded targets
pub const SHIELD_MULT: f32 = 0.5;
pub const SWORD_BASE_CONE: f32 = std::f32::consts::PI / 3.0;
pub const SWORD_VISUAL_TIME: f32 = 0.3;
pub const ARROW_SPEED: f32 = 700.0;
pub const ARROW_RADIUS: f32 = 4.0;
pub const ARROW_LIFETIME: f32 = 1.5;
pub const PICKUP_RADIUS: f32 = 100.0;
pub const ORB_PICKUP_SLACK: f32 = 10.0;
pub const ORB_DRAG: f32 = 0.9;

/// Fallback combat stats when no weapon is equipped
pub const UNARMED_DAMAGE: f32 = 5.0;
pub const UNARMED_RANGE: f32 = 50.0;
pub const UNARMED_ATTACK_SPEED: f32 = 1.0;

// =====================================================
// Enemies
// =====================================================

pub const ENEMY_PROJECTILE_SPEED: f32 = 350.0;
pub const MELEE_EXPLOSION_RADIUS: f32 = 40.0;
pub const PATROL_RADIUS: f32 = 150.0;
pub const STANDOFF_FACTOR: f32 = 0.8;
pub const LOOT_DROP_CHANCE: f64 = 0.4;

pub const BOSS_XP: u32 = 500;
pub const GRUNT_XP: u32 = 10;
pub const CASTER_XP: u32 = 20;
pub const BOSS_SCORE: u64 = 500;
pub const ENEMY_SCORE: u64 = 50;

/// Arena seal triggers this many tiles inside the boss room edge
pub const ARENA_MARGIN_TILES: f32 = 1.5;

// =====================================================
// Game flow
// =====================================================

/// Delay before a cleared dungeon returns to the menu
pub const CLEAR_RETURN_DELAY: f64 = 4.0;
/// Delay before game over restarts into the menu
pub const GAME_OVER_DELAY: f64 = 3.0;
pub const MISSIONS_PER_BATCH: usize = 3;
