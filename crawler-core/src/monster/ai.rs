//! Standard enemy AI.
//!
//! AI functions only touch the enemy they are given. Anything that affects the
//! rest of the world (projectiles, player damage, particles) is returned as an
//! [`EnemyAction`] for the world tick to apply.

use bevy::math::Vec2;
use rand::Rng;

use super::{boss, AiState, Enemy, EnemyKind};
use crate::constants::{
    ENEMY_PROJECTILE_SPEED, MELEE_EXPLOSION_RADIUS, PATROL_RADIUS, STANDOFF_FACTOR,
};
use crate::geometry::{angle_between, direction};

/// What the AI needs to know about the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub pos: Vec2,
    pub is_dodging: bool,
}

/// Enemy-owned projectile to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub color: &'static str,
}

/// Side effect requested by an enemy
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    SpawnProjectile(ProjectileSpec),
    /// Direct damage; dodge checks have already been made
    HitPlayer { amount: f32 },
    /// Stationary effect particle
    Burst {
        pos: Vec2,
        size: f32,
        life: f32,
        color: &'static str,
    },
}

const PATROL_ARRIVE_DIST: f32 = 5.0;
const PATROL_SPEED_MULT: f32 = 0.5;

/// Run one enemy's behaviour for one tick
pub fn update_enemy<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    player: PlayerView,
    dt: f32,
    rng: &mut R,
) -> Vec<EnemyAction> {
    match enemy.kind {
        EnemyKind::Boss(id) => boss::update_boss(enemy, id, player, dt),
        EnemyKind::Grunt | EnemyKind::Caster => update_standard(enemy, player, dt, rng),
    }
}

/// Move straight toward (or, with a negative speed, away from) a point
pub(crate) fn step_toward(enemy: &mut Enemy, target: Vec2, speed: f32, dt: f32) {
    let angle = angle_between(enemy.pos, target);
    enemy.pos += direction(angle) * speed * dt;
}

fn update_standard<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    player: PlayerView,
    dt: f32,
    rng: &mut R,
) -> Vec<EnemyAction> {
    let mut actions = Vec::new();
    let dist = enemy.pos.distance(player.pos);

    if enemy.state == AiState::Burrowed {
        if enemy.is_burrower && dist < enemy.aggro_range {
            enemy.state = AiState::Chase;
            actions.push(EnemyAction::Burst {
                pos: enemy.pos,
                size: 30.0,
                life: 0.5,
                color: "#d4a373",
            });
        }
        return actions;
    }

    if enemy.attack_timer > 0.0 {
        enemy.attack_timer -= dt;
    }

    match enemy.state {
        AiState::Idle => {
            if dist < enemy.aggro_range {
                enemy.state = AiState::Chase;
            } else {
                patrol(enemy, dt, rng);
            }
        }
        AiState::Chase => {
            if enemy.attack_timer <= 0.0 && dist < enemy.attack_range {
                enemy.state = AiState::Preparing;
                enemy.target_pos = Some(player.pos);
                enemy.telegraph_timer = enemy.telegraph_duration;
            } else {
                // ranged enemies hold at a stand-off distance
                let desired = if enemy.is_ranged {
                    enemy.attack_range * STANDOFF_FACTOR
                } else {
                    0.0
                };
                if dist > desired {
                    step_toward(enemy, player.pos, enemy.speed, dt);
                }
            }
        }
        AiState::Preparing => {
            enemy.telegraph_timer -= dt;
            if enemy.telegraph_timer <= 0.0 {
                enemy.state = AiState::Attacking;
                execute_attack(enemy, player, &mut actions);
                enemy.attack_timer = enemy.attack_cooldown;
                enemy.state = AiState::Chase;
            }
        }
        AiState::Attacking => enemy.state = AiState::Chase,
        AiState::Burrowed => {}
    }

    actions
}

fn execute_attack(enemy: &Enemy, player: PlayerView, actions: &mut Vec<EnemyAction>) {
    if enemy.is_ranged {
        actions.push(EnemyAction::SpawnProjectile(ProjectileSpec {
            origin: enemy.pos,
            angle: angle_between(enemy.pos, player.pos),
            speed: ENEMY_PROJECTILE_SPEED,
            radius: 5.0,
            damage: enemy.damage,
            lifetime: 3.0,
            color: "#ef4444",
        }));
        return;
    }

    let Some(target) = enemy.target_pos else {
        return;
    };
    if target.distance(player.pos) < MELEE_EXPLOSION_RADIUS && !player.is_dodging {
        actions.push(EnemyAction::HitPlayer {
            amount: enemy.damage,
        });
    }
    actions.push(EnemyAction::Burst {
        pos: target,
        size: MELEE_EXPLOSION_RADIUS,
        life: 0.4,
        color: "rgba(239, 68, 68, 0.5)",
    });
}

/// Wander around the spawn point, pausing between legs
fn patrol<R: Rng + ?Sized>(enemy: &mut Enemy, dt: f32, rng: &mut R) {
    if enemy.patrol_timer > 0.0 {
        enemy.patrol_timer -= dt;
    } else if enemy.patrol_target.is_none() {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(0.0..PATROL_RADIUS);
        enemy.patrol_target = Some(enemy.origin + direction(angle) * dist);
        enemy.patrol_timer = rng.gen_range(2.0..5.0);
    } else {
        enemy.patrol_target = None;
        enemy.patrol_timer = rng.gen_range(1.0..3.0);
    }

    if let Some(target) = enemy.patrol_target {
        let delta = target - enemy.pos;
        let dist = delta.length();
        if dist > PATROL_ARRIVE_DIST {
            enemy.pos += delta / dist * enemy.speed * PATROL_SPEED_MULT * dt;
        } else {
            enemy.patrol_target = None;
            enemy.patrol_timer = 1.0;
        }
    }
}
