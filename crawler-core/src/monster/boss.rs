//! Scripted boss fights. Nothing runs until the boss is engaged.

use std::f32::consts::TAU;

use super::ai::{step_toward, EnemyAction, PlayerView, ProjectileSpec};
use super::{AiState, BossId, Enemy};
use crate::geometry::angle_between;

// Kargal
const SMASH_RADIUS: f32 = 120.0;
const SMASH_MULT: f32 = 1.5;
const SHOCKWAVE_COUNT: usize = 12;

// Xerath
const XERATH_POPUP_RANGE: f32 = 200.0;
const XERATH_POPUP_TELEGRAPH: f32 = 0.5;
const SAND_BLAST_COUNT: usize = 8;
const XERATH_SURFACE_TIME: f32 = 1.0;
const XERATH_BURROW_TIME: f32 = 2.0;

// Elara
const ELARA_FLEE_RANGE: f32 = 300.0;
const VOLLEY_SPREAD: f32 = 0.3;

pub fn update_boss(
    enemy: &mut Enemy,
    boss: BossId,
    player: PlayerView,
    dt: f32,
) -> Vec<EnemyAction> {
    if !enemy.engaged {
        return Vec::new();
    }
    if enemy.attack_timer > 0.0 {
        enemy.attack_timer -= dt;
    }
    match boss {
        BossId::Kargal => kargal(enemy, player, dt),
        BossId::Xerath => xerath(enemy, player, dt),
        BossId::Elara => elara(enemy, player, dt),
    }
}

/// Evenly spaced ring of projectiles around the boss
fn ring(
    enemy: &Enemy,
    count: usize,
    speed: f32,
    radius: f32,
    damage: f32,
    lifetime: f32,
    color: &'static str,
) -> impl Iterator<Item = EnemyAction> {
    let origin = enemy.pos;
    (0..count).map(move |k| {
        EnemyAction::SpawnProjectile(ProjectileSpec {
            origin,
            angle: k as f32 / count as f32 * TAU,
            speed,
            radius,
            damage,
            lifetime,
            color,
        })
    })
}

/// Melee bruiser: closes in, winds up, smashes and sends out a shockwave
fn kargal(enemy: &mut Enemy, player: PlayerView, dt: f32) -> Vec<EnemyAction> {
    let mut actions = Vec::new();
    if enemy.state == AiState::Idle {
        enemy.state = AiState::Chase;
    }
    match enemy.state {
        AiState::Chase => {
            step_toward(enemy, player.pos, enemy.speed, dt);
            let dist = enemy.pos.distance(player.pos);
            if enemy.attack_timer <= 0.0 && dist < enemy.attack_range {
                enemy.state = AiState::Preparing;
                enemy.telegraph_timer = enemy.telegraph_duration;
            }
        }
        AiState::Preparing => {
            enemy.telegraph_timer -= dt;
            if enemy.telegraph_timer <= 0.0 {
                if enemy.pos.distance(player.pos) < SMASH_RADIUS && !player.is_dodging {
                    actions.push(EnemyAction::HitPlayer {
                        amount: enemy.damage * SMASH_MULT,
                    });
                }
                actions.extend(ring(
                    enemy,
                    SHOCKWAVE_COUNT,
                    200.0,
                    4.0,
                    enemy.damage * 0.3,
                    1.0,
                    "#94a3b8",
                ));
                enemy.state = AiState::Chase;
                enemy.attack_timer = enemy.attack_cooldown;
            }
        }
        AiState::Attacking | AiState::Burrowed => enemy.state = AiState::Chase,
        AiState::Idle => {}
    }
    actions
}

/// Burrow ambusher: surfaces near the player, blasts a ring, chases briefly,
/// then burrows again. The cycle repeats for the whole fight.
fn xerath(enemy: &mut Enemy, player: PlayerView, dt: f32) -> Vec<EnemyAction> {
    let mut actions = Vec::new();
    let dist = enemy.pos.distance(player.pos);
    match enemy.state {
        AiState::Idle => enemy.state = AiState::Burrowed,
        AiState::Burrowed => {
            if dist < XERATH_POPUP_RANGE {
                enemy.state = AiState::Preparing;
                enemy.telegraph_timer = XERATH_POPUP_TELEGRAPH;
            }
        }
        AiState::Preparing => {
            enemy.telegraph_timer -= dt;
            if enemy.telegraph_timer <= 0.0 {
                actions.extend(ring(
                    enemy,
                    SAND_BLAST_COUNT,
                    300.0,
                    6.0,
                    enemy.damage,
                    2.0,
                    "#eab308",
                ));
                enemy.state = AiState::Chase;
                enemy.attack_timer = XERATH_SURFACE_TIME;
            }
        }
        AiState::Chase => {
            step_toward(enemy, player.pos, enemy.speed, dt);
            if enemy.attack_timer <= 0.0 {
                enemy.state = AiState::Burrowed;
                enemy.attack_timer = XERATH_BURROW_TIME;
            }
        }
        AiState::Attacking => enemy.state = AiState::Chase,
    }
    actions
}

/// Kiter: keeps the player at arm's length and fires a three-shot volley
fn elara(enemy: &mut Enemy, player: PlayerView, dt: f32) -> Vec<EnemyAction> {
    let mut actions = Vec::new();
    if enemy.state == AiState::Idle {
        enemy.state = AiState::Chase;
    }
    match enemy.state {
        AiState::Chase => {
            let dist = enemy.pos.distance(player.pos);
            let speed = if dist < ELARA_FLEE_RANGE {
                -enemy.speed
            } else {
                enemy.speed
            };
            step_toward(enemy, player.pos, speed, dt);
            if enemy.attack_timer <= 0.0 {
                enemy.state = AiState::Preparing;
                enemy.telegraph_timer = enemy.telegraph_duration;
            }
        }
        AiState::Preparing => {
            enemy.telegraph_timer -= dt;
            if enemy.telegraph_timer <= 0.0 {
                let aim = angle_between(enemy.pos, player.pos);
                for angle in [aim, aim - VOLLEY_SPREAD, aim + VOLLEY_SPREAD] {
                    actions.push(EnemyAction::SpawnProjectile(ProjectileSpec {
                        origin: enemy.pos,
                        angle,
                        speed: 350.0,
                        radius: 8.0,
                        damage: enemy.damage,
                        lifetime: 3.0,
                        color: "#4ade80",
                    }));
                }
                enemy.state = AiState::Chase;
                enemy.attack_timer = enemy.attack_cooldown;
            }
        }
        AiState::Attacking | AiState::Burrowed => enemy.state = AiState::Chase,
        AiState::Idle => {}
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;

    fn view(x: f32, y: f32, dodging: bool) -> PlayerView {
        PlayerView {
            pos: Vec2::new(x, y),
            is_dodging: dodging,
        }
    }

    fn engaged(boss: BossId) -> Enemy {
        let mut e = Enemy::boss(1, Vec2::ZERO, boss, 1);
        e.engaged = true;
        e
    }

    fn projectiles(actions: &[EnemyAction]) -> usize {
        actions
            .iter()
            .filter(|a| matches!(a, EnemyAction::SpawnProjectile(_)))
            .count()
    }

    #[test]
    fn test_unengaged_boss_is_inert() {
        let mut e = Enemy::boss(1, Vec2::ZERO, BossId::Kargal, 1);
        let actions = update_boss(&mut e, BossId::Kargal, view(10.0, 0.0, false), 0.1);
        assert!(actions.is_empty());
        assert_eq!(e.pos, Vec2::ZERO);
        assert_eq!(e.state, AiState::Idle);
    }

    #[test]
    fn test_kargal_smash_and_shockwave() {
        let mut e = engaged(BossId::Kargal);
        let player = view(50.0, 0.0, false);
        update_boss(&mut e, BossId::Kargal, player, 0.01);
        assert_eq!(e.state, AiState::Preparing);

        let mut actions = Vec::new();
        for _ in 0..200 {
            actions.extend(update_boss(&mut e, BossId::Kargal, player, 0.01));
            if e.state == AiState::Chase {
                break;
            }
        }
        assert_eq!(projectiles(&actions), 12);
        let expected = e.damage * 1.5;
        assert!(actions.contains(&EnemyAction::HitPlayer { amount: expected }));
        assert!((e.attack_timer - e.attack_cooldown).abs() < f32::EPSILON);
    }

    #[test]
    fn test_kargal_smash_dodged_but_ring_fires() {
        let mut e = engaged(BossId::Kargal);
        e.state = AiState::Preparing;
        e.telegraph_timer = 0.0;
        let actions = update_boss(&mut e, BossId::Kargal, view(50.0, 0.0, true), 0.01);
        assert!(!actions.iter().any(|a| matches!(a, EnemyAction::HitPlayer { .. })));
        assert_eq!(projectiles(&actions), 12);
    }

    #[test]
    fn test_xerath_cycle() {
        let mut e = engaged(BossId::Xerath);
        let far = view(500.0, 0.0, false);
        let near = view(150.0, 0.0, false);

        update_boss(&mut e, BossId::Xerath, far, 0.1);
        assert_eq!(e.state, AiState::Burrowed);

        update_boss(&mut e, BossId::Xerath, near, 0.1);
        assert_eq!(e.state, AiState::Preparing);
        assert!((e.telegraph_timer - 0.5).abs() < f32::EPSILON);

        let mut actions = Vec::new();
        for _ in 0..6 {
            actions.extend(update_boss(&mut e, BossId::Xerath, near, 0.1));
        }
        assert_eq!(projectiles(&actions), 8);
        assert_eq!(e.state, AiState::Chase);

        for _ in 0..12 {
            update_boss(&mut e, BossId::Xerath, far, 0.1);
        }
        assert_eq!(e.state, AiState::Burrowed, "re-burrows after surfacing");
    }

    #[test]
    fn test_elara_flees_then_approaches() {
        let mut e = engaged(BossId::Elara);
        e.attack_timer = 100.0;
        update_boss(&mut e, BossId::Elara, view(100.0, 0.0, false), 0.1);
        assert!(e.pos.x < 0.0, "flees a close player");

        let mut e = engaged(BossId::Elara);
        e.attack_timer = 100.0;
        update_boss(&mut e, BossId::Elara, view(400.0, 0.0, false), 0.1);
        assert!(e.pos.x > 0.0, "approaches a distant player");
    }

    #[test]
    fn test_elara_volley_spread() {
        let mut e = engaged(BossId::Elara);
        e.state = AiState::Preparing;
        e.telegraph_timer = 0.0;
        let actions = update_boss(&mut e, BossId::Elara, view(400.0, 0.0, false), 0.1);
        let angles: Vec<f32> = actions
            .iter()
            .filter_map(|a| match a {
                EnemyAction::SpawnProjectile(p) => Some(p.angle),
                _ => None,
            })
            .collect();
        assert_eq!(angles.len(), 3);
        assert!(angles[0].abs() < 1e-6);
        assert!((angles[1] + 0.3).abs() < 1e-6);
        assert!((angles[2] - 0.3).abs() < 1e-6);
    }
}
