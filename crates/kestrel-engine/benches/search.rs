use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use criterion::{Criterion, criterion_group, criterion_main};
use kestrel_core::Position;
use kestrel_engine::{SearchConfig, SearchControl, SearchOptions, Searcher, evaluate};

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn search_depth(fen: &str, depth: u8) -> u64 {
    let mut pos: Position = fen.parse().unwrap();
    let control = SearchControl::new_unlimited(Arc::new(AtomicBool::new(false)));
    let mut searcher = Searcher::new(SearchOptions { hash_mb: 16, ..SearchOptions::default() });
    searcher.search(&mut pos, &SearchConfig::depth(depth), &control, |_| {}).stats.nodes
}

fn bench_search_start_depth_6(c: &mut Criterion) {
    c.bench_function("search start depth 6", |b| {
        b.iter(|| black_box(search_depth(kestrel_core::STARTING_FEN, 6)))
    });
}

fn bench_search_kiwipete_depth_5(c: &mut Criterion) {
    c.bench_function("search kiwipete depth 5", |b| b.iter(|| black_box(search_depth(KIWIPETE_FEN, 5))));
}

fn bench_evaluate(c: &mut Criterion) {
    let pos: Position = KIWIPETE_FEN.parse().unwrap();
    c.bench_function("evaluate kiwipete", |b| b.iter(|| black_box(evaluate(black_box(&pos)))));
}

criterion_group!(benches, bench_search_start_depth_6, bench_search_kiwipete_depth_5, bench_evaluate);
criterion_main!(benches);
