//! Crawler Core - Dungeon Crawler Simulation Library
//!
//! This crate provides the game logic for a top-down action dungeon crawler:
//! - Dungeon generation (rooms, corridors, boss arena) and portal missions
//! - Player attributes, equipment, inventory and derived combat stats
//! - Enemy templates, patrol/chase AI and three scripted bosses
//! - Sword, bow and staff combat with projectiles and shields
//! - Loot rolls, item sets, shop and experience orbs
//! - Game flow (menu, dungeon, game over) with delayed transitions
//! - A bevy plugin that drives the simulation from a host `App`

pub mod combat;
pub mod constants;
pub mod engine;
pub mod error;
pub mod gameflow;
pub mod generation;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod loot;
pub mod monster;
pub mod player;
pub mod world;

pub use engine::{CrawlerPlugin, SimConfig};
pub use gameflow::{GameState, Simulation};
pub use input::InputIntent;
pub use world::{GameEvent, GameWorld};
