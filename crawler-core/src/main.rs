//! Headless driver: runs a seeded mission for a fixed number of frames and
//! logs what happened. Pass a `.json` or `.ron` config path as the first
//! argument to override the defaults.

use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use tracing::info;

use crawler_core::engine::{CrawlerPlugin, PendingEvents, SimConfig, SimulationResource};
use crawler_core::gameflow::GameState;
use crawler_core::input::InputIntent;
use crawler_core::logging::init_tracing;
use crawler_core::world::GameEvent;

const FRAMES: u32 = 1800;
const FRAME_DT: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            SimConfig::load(&path).with_context(|| format!("loading config from {path}"))?
        }
        None => SimConfig {
            seed: Some(42),
            ..SimConfig::default()
        },
    };
    init_tracing(&config.tracing);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CrawlerPlugin {
            config: config.clone(),
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME_DT));

    let sim = app.world().resource::<SimulationResource>().clone();
    {
        let mut sim = sim
            .0
            .write()
            .map_err(|_| anyhow::anyhow!("simulation lock poisoned"))?;
        let mission = sim
            .missions()
            .first()
            .map(|m| format!("{:?} {:?}: {}", m.rank, m.theme, m.description))
            .unwrap_or_default();
        sim.start_mission(0).context("starting first mission")?;
        info!(%mission, seed = ?config.seed, "mission started");
    }

    let enemies_at_start = sim
        .0
        .read()
        .map_err(|_| anyhow::anyhow!("simulation lock poisoned"))?
        .world()
        .enemies
        .len();

    for frame in 0..FRAMES {
        // zig-zag across the map, attacking while the aim sweeps round
        let angle = frame as f32 * 0.05;
        let center = Vec2::new(config.viewport_width, config.viewport_height) / 2.0;
        {
            let mut input = app.world_mut().resource_mut::<InputIntent>();
            input.move_right = frame % 240 < 120;
            input.move_down = frame % 240 >= 120;
            input.attack_held = true;
            input.dodge_pressed = frame % 90 == 0;
            input.pickup_pressed = frame % 30 == 0;
            input.pointer = center + Vec2::from_angle(angle) * 120.0;
        }
        app.update();

        for event in app.world().resource::<PendingEvents>().0.iter() {
            match event {
                GameEvent::PlayerDied => info!(frame, "player died"),
                GameEvent::LevelUp { level } => info!(frame, level, "level up"),
                GameEvent::ArenaSealed => info!(frame, "arena sealed"),
                GameEvent::DungeonCleared => info!(frame, "dungeon cleared"),
                _ => {}
            }
        }

        let sim = sim
            .0
            .read()
            .map_err(|_| anyhow::anyhow!("simulation lock poisoned"))?;
        if sim.state() != GameState::Dungeon {
            info!(frame, state = ?sim.state(), "left the dungeon");
            break;
        }
    }

    let sim = sim
        .0
        .read()
        .map_err(|_| anyhow::anyhow!("simulation lock poisoned"))?;
    let world = sim.world();
    info!(
        state = ?sim.state(),
        clock = sim.clock(),
        score = world.score,
        level = world.player.level,
        hp = world.player.hp,
        enemies_left = world.enemies.len(),
        enemies_at_start,
        "run summary"
    );
    Ok(())
}
