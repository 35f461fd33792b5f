use bevy::math::Vec2;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crawler_core::generation::{generate_dungeon, Rank, Theme};
use crawler_core::input::InputIntent;
use crawler_core::Simulation;

fn bench_generation(c: &mut Criterion) {
    for theme in Theme::ALL {
        c.bench_function(&format!("generate_dungeon_{theme:?}_rank_c"), |b| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
            b.iter(|| generate_dungeon(black_box(theme), Rank::C, 64, 64.0, &mut rng))
        });
    }

    c.bench_function("generate_dungeon_cave_rank_s", |b| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        b.iter(|| generate_dungeon(Theme::Cave, black_box(Rank::S), 64, 64.0, &mut rng))
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut sim = Simulation::with_seed(7);
    sim.start_mission(0).expect("mission starts");
    let center = sim.world().screen_center();

    c.bench_function("simulation_update_frame", |b| {
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                let mut input = InputIntent {
                    move_right: true,
                    attack_held: true,
                    pointer: center + Vec2::new(80.0, 0.0),
                    ..Default::default()
                };
                sim.update(black_box(1.0 / 60.0), &mut input)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_generation, bench_tick);
criterion_main!(benches);
