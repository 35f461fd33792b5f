//! Game flow: menu, dungeon runs and game over.
//!
//! [`Simulation`] is the single writer of the [`GameWorld`]. It owns the
//! simulation clock, gates the per-frame step on the current [`GameState`],
//! and runs deferred transitions through an explicit [`ScheduledEvents`]
//! queue so a transition scheduled during one run can never leak into the
//! next.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{CLEAR_RETURN_DELAY, GAME_OVER_DELAY};
use crate::engine::config::SimConfig;
use crate::error::ActionError;
use crate::generation::missions::PortalMission;
use crate::input::InputIntent;
use crate::world::tick::TickReport;
use crate::world::{GameEvent, GameWorld};

/// Top-level game states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Picking a portal; the world is frozen
    #[default]
    Menu,
    Dungeon,
    /// Player died; returns to the menu after a delay
    GameOver,
}

/// Deferred transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Restart into the menu after death
    ReturnToMenu,
    /// Back to the menu with fresh missions after the boss fell
    MissionComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub fire_at: f64,
    /// Run the event was scheduled in; other runs ignore it
    pub run_id: u64,
    pub event: ScheduledEvent,
}

/// Delayed events keyed on the simulation clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledEvents {
    pending: Vec<Scheduled>,
}

impl ScheduledEvents {
    pub fn schedule(&mut self, fire_at: f64, run_id: u64, event: ScheduledEvent) {
        self.pending.push(Scheduled {
            fire_at,
            run_id,
            event,
        });
    }

    /// Remove and return everything due at `now`, in scheduling order
    pub fn take_due(&mut self, now: f64) -> Vec<Scheduled> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.fire_at <= now);
        self.pending = pending;
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.pending.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    world: GameWorld,
    state: GameState,
    missions: Vec<PortalMission>,
    current_mission: Option<PortalMission>,
    config: SimConfig,
    /// Seconds of simulated time since creation
    clock: f64,
    run_id: u64,
    scheduled: ScheduledEvents,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut world = GameWorld::new(&config);
        let missions = world.roll_missions(1);
        info!(seed = ?config.seed, "simulation created");
        Self {
            world,
            state: GameState::Menu,
            missions,
            current_mission: None,
            config,
            clock: 0.0,
            run_id: 0,
            scheduled: ScheduledEvents::default(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        })
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Mutable access for the menu/UI mutators (equip, buy, sell, ...)
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn missions(&self) -> &[PortalMission] {
        &self.missions
    }

    pub fn current_mission(&self) -> Option<&PortalMission> {
        self.current_mission.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn scheduled(&self) -> &ScheduledEvents {
        &self.scheduled
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }

    /// JSON snapshot of the world for a renderer
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.world)
    }

    /// Advance by `dt` seconds. `dt` must already be clamped by the driver.
    pub fn update(&mut self, dt: f32, input: &mut InputIntent) -> Option<TickReport> {
        self.clock += f64::from(dt);
        self.fire_due_events();

        if self.state != GameState::Dungeon {
            return None;
        }

        let player = &mut self.world.player;
        if player.hp <= 0.0 {
            player.hp = 0.0;
            player.is_dead = true;
        }
        if player.is_dead {
            self.enter_game_over();
            return None;
        }
        if player.inventory_open {
            return None;
        }

        let report = self.world.step(input, dt, self.clock);
        if report.boss_defeated {
            self.scheduled.schedule(
                self.clock + CLEAR_RETURN_DELAY,
                self.run_id,
                ScheduledEvent::MissionComplete,
            );
        }
        Some(report)
    }

    /// Enter the dungeon for the mission at `index`.
    ///
    /// Requires the menu and a main-hand weapon; a missing weapon is shown
    /// to the player as "WEAPON REQUIRED!".
    pub fn start_mission(&mut self, index: usize) -> Result<(), ActionError> {
        if self.state != GameState::Menu {
            return self.world.report(Err(ActionError::NotInMenu));
        }
        let Some(mission) = self.missions.get(index).cloned() else {
            return self.world.report(Err(ActionError::MissionNotFound(index)));
        };
        if !self.world.player.has_weapon() {
            debug!("mission start rejected: no weapon");
            let center = self.world.screen_center();
            let err = ActionError::WeaponRequired;
            self.world.push_text(center, err.to_string(), "#ef4444", 1.5, -20.0);
            self.world.emit(GameEvent::WeaponRequired);
            return Err(err);
        }

        self.run_id += 1;
        self.world
            .enter_dungeon(&mission, self.config.base_grid_cells, self.clock);
        info!(
            mission = mission.id,
            rank = %mission.rank.letter(),
            theme = ?mission.theme,
            enemies = self.world.enemies.len(),
            "mission started"
        );
        self.current_mission = Some(mission);
        self.state = GameState::Dungeon;
        Ok(())
    }

    /// Fresh level-1 player back in the menu. Score is kept.
    pub fn restart(&mut self) {
        let score = self.world.score;
        self.run_id += 1;
        self.world.clear_run();
        self.world.reset_player();
        self.world.score = score;
        self.missions = self.world.roll_missions(1);
        self.current_mission = None;
        self.state = GameState::Menu;
        info!(score, "restarted");
    }

    pub fn toggle_inventory(&mut self) -> bool {
        self.world.toggle_inventory()
    }

    fn enter_game_over(&mut self) {
        if self.state == GameState::GameOver {
            return;
        }
        warn!(run = self.run_id, level = self.world.player.level, "player died");
        self.state = GameState::GameOver;
        self.world.emit(GameEvent::PlayerDied);
        self.scheduled.schedule(
            self.clock + GAME_OVER_DELAY,
            self.run_id,
            ScheduledEvent::ReturnToMenu,
        );
    }

    fn fire_due_events(&mut self) {
        for due in self.scheduled.take_due(self.clock) {
            if due.run_id != self.run_id {
                debug!(event = ?due.event, "stale scheduled event dropped");
                continue;
            }
            match (due.event, self.state) {
                (ScheduledEvent::ReturnToMenu, GameState::GameOver) => self.restart(),
                (ScheduledEvent::MissionComplete, GameState::Dungeon) => {
                    self.state = GameState::Menu;
                    self.missions = self.world.roll_missions(self.world.player.level);
                    self.current_mission = None;
                    self.world.mission_timer = None;
                    info!(level = self.world.player.level, "mission complete");
                }
                (event, state) => {
                    debug!(?event, ?state, "scheduled event no longer applies");
                }
            }
        }
    }
}

/// Screen-space pointer that aims at a world position, given the camera
pub fn pointer_for(world: &GameWorld, target: Vec2) -> Vec2 {
    target - world.camera + world.screen_center()
}
