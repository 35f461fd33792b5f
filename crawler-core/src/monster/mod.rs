//! Enemies: templates, spawning and per-kind rewards.
//!
//! All enemies share one struct. Behaviour is selected by [`EnemyKind`]:
//! standard enemies run the finite-state machine in [`ai`], bosses run their
//! scripted fight in [`boss`].

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{BOSS_SCORE, BOSS_XP, CASTER_XP, ENEMY_SCORE, GRUNT_XP, SHIELD_MULT};
use crate::generation::grid::Room;
use crate::generation::Theme;
use crate::world::IdAllocator;

pub mod ai;
pub mod boss;

/// The three unique bosses, one per theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossId {
    Kargal,
    Xerath,
    Elara,
}

impl BossId {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Cave => BossId::Kargal,
            Theme::Desert => BossId::Xerath,
            Theme::Forest => BossId::Elara,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Caster,
    Boss(BossId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Preparing,
    Attacking,
    Burrowed,
}

/// Standard enemy species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Goblin,
    Orc,
    SandWorm,
    DustMage,
    ForestSpirit,
    AncientEnt,
}

impl Species {
    /// Species that populate a theme's rooms
    pub fn for_theme(theme: Theme) -> [Species; 2] {
        match theme {
            Theme::Cave => [Species::Goblin, Species::Orc],
            Theme::Desert => [Species::SandWorm, Species::DustMage],
            Theme::Forest => [Species::ForestSpirit, Species::AncientEnt],
        }
    }
}

/// Static stat block an enemy is created from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub kind: EnemyKind,
    pub radius: f32,
    pub color: &'static str,
    pub hp: f32,
    pub speed: f32,
    pub damage: f32,
    pub state: AiState,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub telegraph_duration: f32,
    pub is_ranged: bool,
    pub has_shield: bool,
    pub is_phasing: bool,
    pub is_burrower: bool,
}

const BASE: EnemyTemplate = EnemyTemplate {
    name: "",
    kind: EnemyKind::Grunt,
    radius: 18.0,
    color: "#ef4444",
    hp: 30.0,
    speed: 100.0,
    damage: 10.0,
    state: AiState::Idle,
    aggro_range: 250.0,
    attack_range: 30.0,
    attack_cooldown: 1.5,
    telegraph_duration: 0.0,
    is_ranged: false,
    has_shield: false,
    is_phasing: false,
    is_burrower: false,
};

pub fn template(species: Species) -> EnemyTemplate {
    match species {
        Species::Goblin => EnemyTemplate {
            name: "Goblin",
            radius: 18.0,
            color: "#ef4444",
            hp: 30.0,
            speed: 170.0,
            damage: 8.0,
            aggro_range: 250.0,
            attack_range: 30.0,
            attack_cooldown: 1.5,
            ..BASE
        },
        Species::Orc => EnemyTemplate {
            name: "Orc",
            radius: 25.0,
            color: "#b91c1c",
            hp: 80.0,
            speed: 120.0,
            damage: 20.0,
            aggro_range: 300.0,
            attack_range: 40.0,
            attack_cooldown: 2.0,
            has_shield: true,
            ..BASE
        },
        Species::SandWorm => EnemyTemplate {
            name: "Sand Worm",
            radius: 20.0,
            color: "#eab308",
            hp: 50.0,
            speed: 100.0,
            damage: 15.0,
            state: AiState::Burrowed,
            aggro_range: 150.0,
            attack_range: 40.0,
            attack_cooldown: 1.0,
            is_burrower: true,
            ..BASE
        },
        Species::DustMage => EnemyTemplate {
            name: "Dust Mage",
            kind: EnemyKind::Caster,
            radius: 18.0,
            color: "#fcd34d",
            hp: 40.0,
            speed: 90.0,
            damage: 12.0,
            aggro_range: 400.0,
            attack_range: 300.0,
            attack_cooldown: 3.0,
            telegraph_duration: 1.0,
            is_ranged: true,
            ..BASE
        },
        Species::ForestSpirit => EnemyTemplate {
            name: "Forest Spirit",
            radius: 15.0,
            color: "#4ade80",
            hp: 35.0,
            speed: 110.0,
            damage: 12.0,
            aggro_range: 300.0,
            attack_range: 25.0,
            attack_cooldown: 1.2,
            is_phasing: true,
            ..BASE
        },
        Species::AncientEnt => EnemyTemplate {
            name: "Ancient Ent",
            radius: 30.0,
            color: "#14532d",
            hp: 120.0,
            speed: 60.0,
            damage: 25.0,
            aggro_range: 200.0,
            attack_range: 50.0,
            attack_cooldown: 2.5,
            has_shield: true,
            ..BASE
        },
    }
}

pub fn boss_template(boss: BossId) -> EnemyTemplate {
    match boss {
        BossId::Kargal => EnemyTemplate {
            name: "Kargal, Iron Crusher",
            kind: EnemyKind::Boss(boss),
            radius: 50.0,
            color: "#64748b",
            hp: 1000.0,
            speed: 90.0,
            damage: 70.0,
            aggro_range: 600.0,
            attack_range: 100.0,
            attack_cooldown: 3.0,
            telegraph_duration: 1.5,
            has_shield: true,
            ..BASE
        },
        BossId::Xerath => EnemyTemplate {
            name: "Xerath, Sand Scourge",
            kind: EnemyKind::Boss(boss),
            radius: 60.0,
            color: "#a16207",
            hp: 800.0,
            speed: 180.0,
            damage: 45.0,
            state: AiState::Burrowed,
            aggro_range: 400.0,
            attack_range: 200.0,
            attack_cooldown: 2.0,
            telegraph_duration: 0.8,
            is_ranged: true,
            is_burrower: true,
            ..BASE
        },
        BossId::Elara => EnemyTemplate {
            name: "Elara, Twisted Matriarch",
            kind: EnemyKind::Boss(boss),
            radius: 55.0,
            color: "#166534",
            hp: 1200.0,
            speed: 80.0,
            damage: 40.0,
            aggro_range: 600.0,
            attack_range: 450.0,
            attack_cooldown: 3.5,
            telegraph_duration: 1.5,
            is_ranged: true,
            has_shield: true,
            is_phasing: true,
            ..BASE
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub is_dead: bool,

    pub name: String,
    pub kind: EnemyKind,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_timer: f32,
    pub damage: f32,

    pub state: AiState,
    pub telegraph_timer: f32,
    pub telegraph_duration: f32,
    /// Point a melee telegraph will land on
    pub target_pos: Option<Vec2>,
    pub origin: Vec2,
    pub patrol_target: Option<Vec2>,
    pub patrol_timer: f32,

    pub is_ranged: bool,
    pub has_shield: bool,
    pub is_phasing: bool,
    pub is_burrower: bool,
    /// Bosses only: set once when the arena seals
    pub engaged: bool,
}

impl Enemy {
    pub fn from_template(id: u64, pos: Vec2, t: &EnemyTemplate) -> Self {
        Self {
            id,
            pos,
            radius: t.radius,
            color: t.color.to_string(),
            hp: t.hp,
            max_hp: t.hp,
            speed: t.speed,
            is_dead: false,
            name: t.name.to_string(),
            kind: t.kind,
            aggro_range: t.aggro_range,
            attack_range: t.attack_range,
            attack_cooldown: t.attack_cooldown,
            attack_timer: 0.0,
            damage: t.damage,
            state: t.state,
            telegraph_timer: 0.0,
            telegraph_duration: t.telegraph_duration,
            target_pos: None,
            origin: pos,
            patrol_target: None,
            patrol_timer: 0.0,
            is_ranged: t.is_ranged,
            has_shield: t.has_shield,
            is_phasing: t.is_phasing,
            is_burrower: t.is_burrower,
            engaged: false,
        }
    }

    /// Boss scaled by mission difficulty
    pub fn boss(id: u64, pos: Vec2, boss: BossId, difficulty: u32) -> Self {
        let t = boss_template(boss);
        let mut enemy = Self::from_template(id, pos, &t);
        enemy.max_hp = t.hp * difficulty.max(1) as f32;
        enemy.hp = enemy.max_hp;
        enemy.damage = t.damage * (1.0 + difficulty as f32 * 0.1);
        enemy
    }

    pub fn boss_id(&self) -> Option<BossId> {
        match self.kind {
            EnemyKind::Boss(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss_id().is_some()
    }

    pub fn is_burrowed(&self) -> bool {
        self.state == AiState::Burrowed
    }

    pub fn xp_reward(&self) -> u32 {
        match self.kind {
            EnemyKind::Boss(_) => BOSS_XP,
            EnemyKind::Grunt => GRUNT_XP,
            EnemyKind::Caster => CASTER_XP,
        }
    }

    pub fn score_reward(&self) -> u64 {
        if self.is_boss() {
            BOSS_SCORE
        } else {
            ENEMY_SCORE
        }
    }

    /// Damage actually taken from a player source after the shield modifier
    pub fn mitigate(&self, raw: f32) -> f32 {
        if self.has_shield {
            raw * SHIELD_MULT
        } else {
            raw
        }
    }
}

/// Populate every room except the first (start) and last (boss) with 1-3
/// theme enemies, then add the boss at `boss_pos`.
pub fn spawn_enemies<R: Rng + ?Sized>(
    rooms: &[Room],
    theme: Theme,
    difficulty: u32,
    boss_pos: Vec2,
    tile_size: f32,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Vec<Enemy> {
    let species = Species::for_theme(theme);
    let mut enemies = Vec::new();

    if rooms.len() > 2 {
        for room in &rooms[1..rooms.len() - 1] {
            let count = rng.gen_range(1..=3);
            for _ in 0..count {
                let kind = species[rng.gen_range(0..species.len())];
                let pos = Vec2::new(
                    (room.x as f32 + rng.gen::<f32>() * room.w as f32) * tile_size,
                    (room.y as f32 + rng.gen::<f32>() * room.h as f32) * tile_size,
                );
                enemies.push(Enemy::from_template(ids.next_id(), pos, &template(kind)));
            }
        }
    }

    let boss = BossId::for_theme(theme);
    enemies.push(Enemy::boss(ids.next_id(), boss_pos, boss, difficulty));
    enemies
}
