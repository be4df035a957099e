use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pokeai::ai::{FlatMonteCarlo, Mcts, NullLog, Policy};
use pokeai::core::Side;
use pokeai::game::GameState;
use pokeai::sim::presets;
use pokeai::utils::make_rng;
use pprof::criterion::{Output, PProfProfiler};

fn search_position<P: Policy>(policy: &P, state: &GameState, seed: u64) {
    let mut rng = make_rng(Some(seed));
    let action = policy.select(state, Side::P1, &mut rng, &mut NullLog);
    // prevent the result from being optimized away
    black_box(action.ok());
}

fn search_benchmark(c: &mut Criterion) {
    let state: GameState = GameState::from_parties(&presets::electric(), &presets::water(), Some(1))
        .expect("preset parties are valid");
    let playouts = 200;

    let mcts = Mcts::new(playouts, 0.7, 0.1).expect("valid mcts parameters");
    c.bench_function(&format!("mcts_{}_playouts", playouts), |b| {
        b.iter(|| search_position(black_box(&mcts), black_box(&state), 7))
    });

    let flat = FlatMonteCarlo::new(playouts, 0.1).expect("valid flat mc parameters");
    c.bench_function(&format!("flat_mc_{}_playouts", playouts), |b| {
        b.iter(|| search_position(black_box(&flat), black_box(&state), 7))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = search_benchmark
}
criterion_main!(benches);
