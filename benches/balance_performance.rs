//! Performance benchmarks for team balancing and the roster store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use team_draw::balancer::{order_by_rating, place_greedy, plan_capacities, GreedyTeamBalancer};
use team_draw::roster::{JsonFileRosterStore, RosterStorage};
use team_draw::types::Player;

fn create_bench_roster(count: usize) -> Vec<Arc<Player>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let rating = f64::from(rng.random_range(0u8..=10)) * 0.5;
            Arc::new(Player::new(i as u64 + 1, format!("player_{}", i), rating))
        })
        .collect()
}

fn bench_draw(c: &mut Criterion) {
    let balancer = GreedyTeamBalancer::new();
    let mut group = c.benchmark_group("draw");

    for count in [10usize, 100, 1_000] {
        let players = create_bench_roster(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &players, |b, players| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(balancer.draw_with_rng(players, 5, &mut rng)))
        });
    }

    group.finish();
}

fn bench_greedy_placement(c: &mut Criterion) {
    let players = create_bench_roster(1_000);
    let mut rng = StdRng::seed_from_u64(42);
    let ordered = order_by_rating(&players, &mut rng);
    let capacities = plan_capacities(players.len(), 5);

    c.bench_function("greedy_placement_1000", |b| {
        b.iter(|| black_box(place_greedy(&ordered, &capacities)))
    });
}

fn bench_store_add(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileRosterStore::new(dir.path().join("players.json")).unwrap();
    for i in 0..50 {
        store.add(&format!("seed_{}", i), 2.5).unwrap();
    }

    c.bench_function("json_store_add", |b| {
        b.iter(|| black_box(store.add("bench_player", 3.0)))
    });
}

criterion_group!(benches, bench_draw, bench_greedy_placement, bench_store_add);
criterion_main!(benches);
