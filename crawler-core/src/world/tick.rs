//! The per-frame world step.
//!
//! Stages run in a fixed order every tick; see [`GameWorld::step`]. Every
//! collection that loses elements mid-iteration is walked from the highest
//! index down so removals never skip a neighbour.

use bevy::math::Vec2;
use rand::Rng;
use tracing::{debug, info, trace};

use super::{GameEvent, GameWorld};
use crate::combat::projectile::{self, Flight, PlayerTarget, Projectile};
use crate::combat::{self, Hit};
use crate::constants::{
    ATTACK_SLOW, CAMERA_SPEED, CAMERA_SPEED_SPRINT, DODGE_COOLDOWN, DODGE_DURATION, DODGE_MULT,
    LOOT_DROP_CHANCE, ORB_DRAG, ORB_PICKUP_SLACK, OUT_OF_COMBAT_DELAY, PICKUP_RADIUS, SPRINT_MULT,
    SWORD_VISUAL_TIME,
};
use crate::geometry::{direction, resolve_wall_collision};
use crate::input::InputIntent;
use crate::loot::{generate_boss_loot, generate_loot, generate_xp_orbs, WeaponKind};
use crate::monster::ai::{update_enemy, EnemyAction, PlayerView};
use crate::monster::Enemy;
use crate::player::stats::{calculate_weapon_stats, CombatStats};

const DAMAGE_COLOR: &str = "#ffffff";
const SHIELD_COLOR: &str = "#60a5fa";
const STAFF_COLOR: &str = "#3b82f6";
const HURT_COLOR: &str = "#ef4444";
const GOLD_COLOR: &str = "#ffd700";
const XP_COLOR: &str = "#00ffff";

/// What happened during one step that the flow layer cares about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub arena_sealed: bool,
    pub boss_defeated: bool,
    pub timed_out: bool,
    pub level_ups: u32,
    pub enemies_killed: u32,
}

impl GameWorld {
    /// Advance the dungeon by `dt` seconds.
    ///
    /// `now` is the simulation clock for this tick; every combat-time check
    /// reads it. The caller is responsible for the game-state early-outs
    /// and for clamping `dt`.
    pub fn step(&mut self, input: &mut InputIntent, dt: f32, now: f64) -> TickReport {
        let mut report = TickReport {
            arena_sealed: self.check_arena_seal(),
            ..TickReport::default()
        };

        let aim = input.pointer - self.screen_center();
        self.player.facing_angle = aim.y.atan2(aim.x);

        self.tick_player_timers(dt);
        let sprinting = self.move_player(input, dt, now);

        if input.pickup_pressed && self.pickup_nearest() {
            input.pickup_pressed = false;
        }

        let stats = calculate_weapon_stats(&self.player);
        self.player.is_attacking = input.attack_held;
        self.player_attack(input, &stats, now);

        self.tick_projectiles(dt, now);
        report.level_ups = self.tick_orbs(dt);
        self.tick_enemies(dt, now, &mut report);
        self.tick_effects(dt);

        if let Some(timer) = self.mission_timer.as_mut() {
            *timer -= dt;
            if *timer <= 0.0 {
                *timer = 0.0;
                if self.player.hp > 0.0 {
                    info!("mission timer expired");
                    report.timed_out = true;
                }
                self.player.hp = 0.0;
            }
        }

        let cam_speed = if sprinting {
            CAMERA_SPEED_SPRINT
        } else {
            CAMERA_SPEED
        };
        self.camera += (self.player.pos - self.camera) * cam_speed * dt;

        report
    }

    fn tick_player_timers(&mut self, dt: f32) {
        let p = &mut self.player;
        if p.dodge_duration > 0.0 {
            p.dodge_duration -= dt;
            p.is_dodging = true;
        } else {
            p.is_dodging = false;
        }
        if p.dodge_cooldown > 0.0 {
            p.dodge_cooldown -= dt;
        }
        if p.attack_cooldown > 0.0 {
            p.attack_cooldown -= dt;
        }
        if p.attack_visual_timer > 0.0 {
            p.attack_visual_timer -= dt;
        }
    }

    /// Dodge trigger, speed resolution and wall-resolved movement.
    /// Returns whether the player is sprinting out of combat.
    fn move_player(&mut self, input: &InputIntent, dt: f32, now: f64) -> bool {
        let mut heading = input.movement();

        let p = &self.player;
        if input.dodge_pressed && p.dodge_cooldown <= 0.0 && !p.is_dodging {
            if heading == Vec2::ZERO {
                heading = direction(p.facing_angle);
            }
            let p = &mut self.player;
            p.is_dodging = true;
            p.dodge_duration = DODGE_DURATION;
            p.dodge_cooldown = DODGE_COOLDOWN;
            p.last_combat_time = now;
            trace!("dodge");

            let origin = self.player.pos;
            for _ in 0..5 {
                let jitter = Vec2::new(
                    self.rng.gen_range(-25.0..25.0),
                    self.rng.gen_range(-25.0..25.0),
                );
                let vel = -heading * 100.0 + jitter;
                self.spawn_particle(origin, vel, 0.3, "rgba(100, 200, 255, 0.5)", 10.0);
            }
        }

        let p = &mut self.player;
        let sprinting = now - p.last_combat_time > OUT_OF_COMBAT_DELAY
            && !p.is_dodging
            && !input.attack_held;
        let mult = if p.is_dodging {
            DODGE_MULT
        } else if sprinting {
            SPRINT_MULT
        } else if input.attack_held && p.has_weapon() {
            ATTACK_SLOW
        } else {
            1.0
        };

        p.pos += heading * p.speed * mult * dt;
        resolve_wall_collision(&mut p.pos, p.radius, &self.tiles, self.tile_size);
        sprinting
    }

    /// Pick up the closest ground item in reach. Returns false when none is.
    fn pickup_nearest(&mut self) -> bool {
        let pos = self.player.pos;
        let nearest = self
            .items
            .iter()
            .map(|g| (g.item.id, g.pos.distance(pos)))
            .filter(|&(_, d)| d < PICKUP_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((id, _)) = nearest else {
            return false;
        };
        // rejection is already surfaced as feedback
        let _ = self.pickup_item(id);
        true
    }

    fn player_attack(&mut self, input: &InputIntent, stats: &CombatStats, now: f64) {
        let p = &self.player;
        if !input.attack_held || p.attack_cooldown > 0.0 || p.is_dodging {
            return;
        }
        let Some(kind) = p.weapon_kind() else {
            return;
        };

        let p = &mut self.player;
        p.attack_cooldown = 1.0 / stats.attack_speed;
        p.last_combat_time = now;
        let (origin, facing) = (p.pos, p.facing_angle);

        match kind {
            WeaponKind::Sword => {
                p.attack_visual_timer = SWORD_VISUAL_TIME;
                let hits = combat::sword_sweep(origin, facing, stats, &mut self.enemies);
                self.damage_numbers(&hits, DAMAGE_COLOR);
                self.spawn_particle(origin, Vec2::ZERO, 0.15, "rgba(200, 200, 255, 0.5)", stats.range);
            }
            WeaponKind::Bow => {
                let id = self.ids.next_id();
                self.projectiles
                    .push(Projectile::arrow(id, origin, facing, stats.damage));
            }
            WeaponKind::Staff => {
                p.attack_visual_timer = SWORD_VISUAL_TIME;
                let cursor = self.camera + input.pointer - self.screen_center();
                let target = combat::staff_target(origin, cursor, stats.range);
                self.spawn_particle(target, Vec2::ZERO, 0.5, "rgba(59, 130, 246, 0.4)", stats.aoe_radius);
                let hits = combat::staff_blast(target, stats, &mut self.enemies);
                self.damage_numbers(&hits, STAFF_COLOR);
            }
        }
    }

    fn damage_numbers(&mut self, hits: &[Hit], color: &str) {
        for hit in hits {
            let color = if hit.shielded { SHIELD_COLOR } else { color };
            self.push_text(hit.pos, format!("{}", hit.damage.round()), color, 0.5, -50.0);
        }
    }

    fn hurt_player(&mut self, amount: f32, now: f64) {
        self.player.apply_damage(amount);
        self.player.last_combat_time = now;
        let pos = self.player.pos;
        self.push_text(pos, format!("-{}", amount.round()), HURT_COLOR, 0.8, -30.0);
    }

    fn tick_projectiles(&mut self, dt: f32, now: f64) {
        for i in (0..self.projectiles.len()).rev() {
            let target = PlayerTarget {
                pos: self.player.pos,
                radius: self.player.radius,
                is_dodging: self.player.is_dodging,
            };
            let flight = projectile::advance(
                &mut self.projectiles[i],
                dt,
                &self.tiles,
                self.tile_size,
                &mut self.enemies,
                target,
            );
            match flight {
                Flight::Flying => continue,
                Flight::HitEnemy { index, damage } => {
                    let hit = Hit {
                        index,
                        pos: self.enemies[index].pos,
                        damage,
                        shielded: self.enemies[index].has_shield,
                    };
                    self.damage_numbers(&[hit], DAMAGE_COLOR);
                }
                Flight::HitPlayer { damage } => self.hurt_player(damage, now),
                Flight::Blocked | Flight::Expired => {}
            }
            self.projectiles.remove(i);
        }
    }

    /// Drift orbs and collect the ones touching the player.
    /// Returns the number of level-ups.
    fn tick_orbs(&mut self, dt: f32) -> u32 {
        let mut level_ups = 0;
        for i in (0..self.xp_orbs.len()).rev() {
            let orb = &mut self.xp_orbs[i];
            orb.pos += orb.vel * dt;
            orb.vel *= ORB_DRAG;
            let reach = self.player.radius + orb.radius + ORB_PICKUP_SLACK;
            if orb.pos.distance(self.player.pos) >= reach {
                continue;
            }

            let orb = self.xp_orbs.remove(i);
            let pos = self.player.pos;
            self.push_text(pos - Vec2::new(0.0, 20.0), format!("+{} XP", orb.value), XP_COLOR, 0.5, -50.0);
            if self.player.gain_exp(orb.value) {
                level_ups += 1;
                self.push_text(pos - Vec2::new(0.0, 40.0), "LEVEL UP!", GOLD_COLOR, 2.0, -20.0);
                self.emit(GameEvent::LevelUp {
                    level: self.player.level,
                });
            }
        }
        level_ups
    }

    fn tick_enemies(&mut self, dt: f32, now: f64, report: &mut TickReport) {
        for i in (0..self.enemies.len()).rev() {
            let enemy = &mut self.enemies[i];
            if !enemy.is_phasing {
                resolve_wall_collision(&mut enemy.pos, enemy.radius, &self.tiles, self.tile_size);
            }

            if enemy.hp <= 0.0 {
                let mut dead = self.enemies.remove(i);
                dead.is_dead = true;
                self.on_enemy_killed(dead, report);
                continue;
            }

            let view = PlayerView {
                pos: self.player.pos,
                is_dodging: self.player.is_dodging,
            };
            let actions = update_enemy(&mut self.enemies[i], view, dt, &mut self.rng);
            for action in actions {
                self.apply_enemy_action(action, now);
            }
        }
    }

    fn apply_enemy_action(&mut self, action: EnemyAction, now: f64) {
        match action {
            EnemyAction::SpawnProjectile(spec) => {
                let id = self.ids.next_id();
                self.projectiles.push(Projectile::from_spec(id, &spec));
            }
            EnemyAction::HitPlayer { amount } => self.hurt_player(amount, now),
            EnemyAction::Burst {
                pos,
                size,
                life,
                color,
            } => self.spawn_particle(pos, Vec2::ZERO, life, color, size),
        }
    }

    /// Loot, experience and score for a removed enemy
    fn on_enemy_killed(&mut self, enemy: Enemy, report: &mut TickReport) {
        report.enemies_killed += 1;
        let level = self.player.level;

        if let Some(boss) = enemy.boss_id() {
            let drop = generate_boss_loot(enemy.pos, level, boss, self.rank, &mut self.ids, &mut self.rng);
            self.items.push(drop);
        } else if self.rng.gen::<f64>() < LOOT_DROP_CHANCE {
            let drop = generate_loot(enemy.pos, level, &mut self.ids, &mut self.rng);
            self.items.push(drop);
        }

        let orbs = generate_xp_orbs(enemy.pos, enemy.xp_reward(), &mut self.ids, &mut self.rng);
        self.xp_orbs.extend(orbs);
        self.score += enemy.score_reward();

        if enemy.is_boss() {
            info!(boss = %enemy.name, score = self.score, "boss defeated");
            report.boss_defeated = true;
            self.push_text(enemy.pos, "DUNGEON CLEARED", GOLD_COLOR, 3.0, -10.0);
            self.emit(GameEvent::DungeonCleared);
        } else {
            debug!(name = %enemy.name, "enemy killed");
        }
    }

    fn tick_effects(&mut self, dt: f32) {
        self.texts.retain_mut(|t| {
            t.life -= dt;
            t.pos.y += t.vy * dt;
            t.life > 0.0
        });
        self.particles.retain_mut(|p| {
            p.life -= dt;
            p.pos += p.vel * dt;
            p.life > 0.0
        });
    }
}
