use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_sim::cards::{Card, Rank, Suit};
use holdem_sim::equity::EquityRequest;
use holdem_sim::evaluator::{score, score_five};
use holdem_sim::hand::HoleCards;

fn bench_score_five(c: &mut Criterion) {
    let hi = [
        Card::new(Rank::Ace, Suit::Hearts),
        Card::new(Rank::King, Suit::Diamonds),
        Card::new(Rank::Seven, Suit::Spades),
        Card::new(Rank::Five, Suit::Clubs),
        Card::new(Rank::Two, Suit::Diamonds),
    ];
    let sf = [
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::King, Suit::Spades),
        Card::new(Rank::Queen, Suit::Spades),
        Card::new(Rank::Jack, Suit::Spades),
        Card::new(Rank::Ten, Suit::Spades),
    ];

    let mut g = c.benchmark_group("score_five");
    g.bench_with_input(BenchmarkId::new("high_card", "A,K,7,5,2"), &hi, |b, input| {
        b.iter(|| score_five(black_box(input)))
    });
    g.bench_with_input(BenchmarkId::new("straight_flush", "royal"), &sf, |b, input| {
        b.iter(|| score_five(black_box(input)))
    });
    g.finish();
}

fn bench_score_seven(c: &mut Criterion) {
    let seven = [
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::Ace, Suit::Hearts),
        Card::new(Rank::King, Suit::Spades),
        Card::new(Rank::Queen, Suit::Spades),
        Card::new(Rank::Jack, Suit::Spades),
        Card::new(Rank::Ten, Suit::Spades),
        Card::new(Rank::Nine, Suit::Spades),
    ];
    c.bench_function("score_seven", |b| b.iter(|| score(black_box(&seven))));
}

fn bench_equity(c: &mut Criterion) {
    let holes: Vec<HoleCards> = vec!["As Ad".parse().unwrap(), "Kh Qh".parse().unwrap()];
    let mut g = c.benchmark_group("equity");
    g.sample_size(10);
    for workers in [1usize, 4] {
        let req = EquityRequest::new(holes.clone(), Vec::new())
            .with_simulations(2_000)
            .with_workers(workers)
            .with_seed(1);
        g.bench_with_input(BenchmarkId::new("preflop_2000", workers), &req, |b, req| {
            b.iter(|| req.run().unwrap())
        });
    }
    g.finish();
}

criterion_group!(benches, bench_score_five, bench_score_seven, bench_equity);
criterion_main!(benches);
