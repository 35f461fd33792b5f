use bevy::prelude::*;
use std::sync::{Arc, RwLock};

use crate::engine::config::SimConfig;
use crate::gameflow::Simulation;
use crate::input::InputIntent;
use crate::world::GameEvent;

/// Drives a [`Simulation`] from bevy's `Update` schedule
#[derive(Default)]
pub struct CrawlerPlugin {
    pub config: SimConfig,
}

impl Plugin for CrawlerPlugin {
    fn build(&self, app: &mut App) {
        let max_frame_dt = self.config.max_frame_dt;
        let simulation = Simulation::new(self.config.clone());

        app.insert_resource(SimulationResource(Arc::new(RwLock::new(simulation))))
            .insert_resource(FrameClamp(max_frame_dt))
            .init_resource::<InputIntent>()
            .init_resource::<PendingEvents>()
            .add_systems(Update, simulation_tick_system);
    }
}

#[derive(Resource, Clone)]
pub struct SimulationResource(pub Arc<RwLock<Simulation>>);

/// Largest dt handed to the simulation in one frame
#[derive(Resource, Debug, Clone, Copy)]
pub struct FrameClamp(pub f32);

/// Events drained from the world this frame, for UI systems to read
#[derive(Resource, Debug, Default)]
pub struct PendingEvents(pub Vec<GameEvent>);

fn simulation_tick_system(
    time: Res<Time>,
    clamp: Res<FrameClamp>,
    sim_res: Res<SimulationResource>,
    mut input: ResMut<InputIntent>,
    mut events: ResMut<PendingEvents>,
) {
    let dt = time.delta_secs().min(clamp.0);
    if let Ok(mut sim) = sim_res.0.write() {
        sim.update(dt, &mut input);
        events.0 = sim.drain_events();
    }
}
