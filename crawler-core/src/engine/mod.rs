//! Host integration: configuration and the bevy plugin.
//!
//! ```text
//!   bevy App (Time, Update) -> CrawlerPlugin -> Simulation::update(dt, input)
//!                                            -> PendingEvents (UI)
//! ```

pub mod config;
pub mod plugin;

pub use config::SimConfig;
pub use plugin::{CrawlerPlugin, FrameClamp, PendingEvents, SimulationResource};

// =====================================================
// Tests
// =====================================================
