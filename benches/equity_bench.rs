//! Benchmarks for hand evaluation and equity trials.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use holdem_odds::cards::parse_cards;
use holdem_odds::equity::{
    Deal, FoldSet, LiveOddsCalculator, OddsConfig, Seat, TrialEngine, TrialSchedule,
};
use holdem_odds::{HandEvaluator, HandRanker};

fn evaluate_7_benchmark(c: &mut Criterion) {
    let eval = HandEvaluator::new();
    let cards = parse_cards("As Kd Qh Jc 9s 8h 2d").unwrap();

    c.bench_function("evaluate_7_cards", |b| {
        b.iter(|| eval.rank(black_box(&cards)).unwrap())
    });
}

fn heads_up_preflop_benchmark(c: &mut Criterion) {
    let eval = HandEvaluator::new();
    let engine = TrialEngine::new(&eval);
    let seats = [
        Seat::Known("As Ah".parse().unwrap()),
        Seat::Known("2c 2d".parse().unwrap()),
    ];

    c.bench_function("heads_up_preflop_10k_trials", |b| {
        b.iter(|| engine.run(&seats, &[], &[], black_box(10_000), 42).unwrap())
    });
}

fn live_flop_benchmark(c: &mut Criterion) {
    let config = OddsConfig::new()
        .with_schedule(TrialSchedule::uniform(10_000))
        .with_seed(42);
    let calc = LiveOddsCalculator::with_config(HandEvaluator::new(), config).unwrap();
    let deal = Deal::parse(&["As Kh", "7d 7c", "Qs Js", "9h 8h"], "Kc 7h 2s").unwrap();
    let folds = FoldSet::new(4).fold(3).unwrap();

    c.bench_function("live_flop_three_way_10k_trials", |b| {
        b.iter(|| calc.compute(black_box(&deal), &folds).unwrap())
    });
}

criterion_group!(
    benches,
    evaluate_7_benchmark,
    heads_up_preflop_benchmark,
    live_flop_benchmark
);
criterion_main!(benches);
