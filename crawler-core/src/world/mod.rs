//! The authoritative game world.
//!
//! `GameWorld` is owned by the [`Simulation`](crate::gameflow::Simulation)
//! driver and mutated in place: by the per-frame [`tick`] and by the
//! inventory/shop mutators. Renderers read it (or its JSON snapshot).

use bevy::math::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::combat::projectile::Projectile;
use crate::engine::config::SimConfig;
use crate::generation::grid::{Room, TileGrid};
use crate::generation::missions::{generate_missions, PortalMission};
use crate::generation::{generate_dungeon, Rank, Theme};
use crate::loot::{ExperienceOrb, GroundItem};
use crate::monster::{spawn_enemies, Enemy};
use crate::player::Player;

pub mod arena;
pub mod tick;

/// Monotonic id source shared by every spawned object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub color: String,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u64,
    pub pos: Vec2,
    pub text: String,
    pub color: String,
    pub life: f32,
    /// Vertical drift in px/s
    pub vy: f32,
}

/// Notifications for the UI layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FloatingFeedback(String),
    ArenaSealed,
    BossEngaged { name: String },
    DungeonCleared,
    LevelUp { level: u32 },
    InventoryFull,
    WeaponRequired,
    PlayerDied,
    MissionStarted { mission_id: u64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct GameWorld {
    /// Dungeon size in pixels
    pub width: f32,
    pub height: f32,
    pub tiles: TileGrid,
    pub tile_size: f32,
    pub theme: Theme,
    pub rank: Rank,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub items: Vec<GroundItem>,
    pub xp_orbs: Vec<ExperienceOrb>,
    pub camera: Vec2,
    /// Persistent currency; survives restarts
    pub score: u64,
    pub boss_room: Option<Room>,
    /// Seconds left before the run fails by timeout
    pub mission_timer: Option<f32>,
    pub viewport: Vec2,
    pub ids: IdAllocator,
    #[serde(skip)]
    rng: Xoshiro256PlusPlus,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameWorld {
    /// Empty world with a fresh player, as at application start
    pub fn new(config: &SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut ids = IdAllocator::default();
        let player = Player::new(ids.next_id(), ids.next_id());
        Self {
            width: 0.0,
            height: 0.0,
            tiles: TileGrid::default(),
            tile_size: config.tile_size,
            theme: Theme::Cave,
            rank: Rank::E,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            items: Vec::new(),
            xp_orbs: Vec::new(),
            camera: Vec2::ZERO,
            score: 0,
            boss_room: None,
            mission_timer: None,
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            ids,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Default config with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        })
    }

    pub fn rng(&mut self) -> &mut Xoshiro256PlusPlus {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn screen_center(&self) -> Vec2 {
        self.viewport / 2.0
    }

    pub fn push_text(&mut self, pos: Vec2, text: impl Into<String>, color: &str, life: f32, vy: f32) {
        let id = self.ids.next_id();
        self.texts.push(FloatingText {
            id,
            pos,
            text: text.into(),
            color: color.to_string(),
            life,
            vy,
        });
    }

    /// Short message above the player's head
    pub fn feedback(&mut self, text: impl Into<String>, color: &str) {
        let pos = self.player.pos - Vec2::new(0.0, 40.0);
        self.push_text(pos, text, color, 1.0, -50.0);
    }

    pub fn spawn_particle(&mut self, pos: Vec2, vel: Vec2, life: f32, color: &str, size: f32) {
        let id = self.ids.next_id();
        self.particles.push(Particle {
            id,
            pos,
            vel,
            life,
            max_life: life,
            color: color.to_string(),
            size,
        });
    }

    /// The live boss of the current run, if any
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss() && !e.is_dead)
    }

    /// Clear every per-run collection
    pub fn clear_run(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.texts.clear();
        self.items.clear();
        self.xp_orbs.clear();
        self.boss_room = None;
        self.mission_timer = None;
    }

    /// Replace the player with a fresh one
    pub fn reset_player(&mut self) {
        let (id, weapon) = (self.ids.next_id(), self.ids.next_id());
        self.player = Player::new(id, weapon);
    }

    /// A fresh batch of portal missions for a player of `level`
    pub fn roll_missions(&mut self, level: u32) -> Vec<PortalMission> {
        generate_missions(level, &mut self.rng, || self.ids.next_id())
    }

    /// Generate and populate the mission's dungeon and drop the player at
    /// its start. The player keeps hp, gear and progression.
    pub fn enter_dungeon(&mut self, mission: &PortalMission, base_grid_cells: usize, now: f64) {
        let map = generate_dungeon(
            mission.theme,
            mission.rank,
            base_grid_cells,
            self.tile_size,
            &mut self.rng,
        );
        self.clear_run();

        self.enemies = spawn_enemies(
            &map.rooms,
            mission.theme,
            mission.difficulty,
            map.boss_pos,
            self.tile_size,
            &mut self.ids,
            &mut self.rng,
        );
        self.tiles = map.tiles;
        self.width = map.width;
        self.height = map.height;
        self.theme = mission.theme;
        self.rank = mission.rank;
        self.boss_room = Some(map.boss_room);
        self.mission_timer = Some(mission.time_limit);
        self.player.pos = map.start_pos;
        self.player.last_combat_time = now;
        self.camera = map.start_pos;

        self.emit(GameEvent::MissionStarted {
            mission_id: mission.id,
        });
    }
}
