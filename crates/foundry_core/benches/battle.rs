//! Battle benchmarks for foundry_core.
//!
//! Run with: `cargo bench -p foundry_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use foundry_core::battle::{play_out, start_battle, BattleMode, DEFAULT_TURN_LIMIT};
use foundry_core::catalog::Catalog;
use foundry_core::combat::apply_move;
use foundry_core::ids::MoveId;
use foundry_core::player::Player;
use foundry_core::rng::SeededRandom;

/// Benchmarks single move resolution and full auto-piloted battles.
pub fn battle_benchmark(c: &mut Criterion) {
    let catalog = Catalog::builtin().expect("bundled catalog");
    let player = Player::starter("bench", "Bench", &catalog).expect("starter profile");

    let attacker = player.roster[0].clone();
    let defender = player.roster[1].clone();
    let strike = catalog
        .require_move(&MoveId::new("strike"))
        .expect("strike move")
        .clone();

    c.bench_function("apply_move", |b| {
        b.iter(|| apply_move(black_box(&attacker), black_box(&strike), black_box(&defender)));
    });

    c.bench_function("play_out_pvp", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut rng = SeededRandom::new(seed);
            let session = start_battle(&player, BattleMode::Pvp, &catalog, &mut rng).expect("start");
            black_box(play_out(session, &catalog, &mut rng, DEFAULT_TURN_LIMIT).expect("finish"))
        });
    });

    c.bench_function("catalog_generate", |b| {
        b.iter(|| black_box(Catalog::builtin().expect("bundled catalog")));
    });
}

criterion_group!(benches, battle_benchmark);
criterion_main!(benches);
