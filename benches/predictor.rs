//! Benchmarks for prediction and statistics over a large ledger

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use round_predictor::ledger::{Digit, Direction, HistoryLedger, Period, Round};
use round_predictor::predictor::{Predictor, TrendPredictor};
use round_predictor::stats::compute_stats;

fn graded_ledger(rounds: u64) -> HistoryLedger {
    let mut ledger = HistoryLedger::new();
    for i in 0..rounds {
        let period = Period::new(20_250_321_100_000_000 + i);
        let predicted = if i % 3 == 0 { Direction::Big } else { Direction::Small };
        ledger
            .insert_pending(Round::pending(period, predicted, Utc::now()))
            .unwrap();
        ledger
            .grade(period, Digit::new((i % 10) as u8).unwrap(), Utc::now())
            .unwrap();
    }
    ledger
}

fn benchmark_trend_predict(c: &mut Criterion) {
    let ledger = graded_ledger(10_000);
    let predictor = TrendPredictor::new();

    c.bench_function("trend_predict_10k", |b| {
        b.iter(|| predictor.predict(black_box(&ledger)))
    });
}

fn benchmark_compute_stats(c: &mut Criterion) {
    let ledger = graded_ledger(10_000);

    c.bench_function("compute_stats_10k", |b| {
        b.iter(|| compute_stats(black_box(&ledger)))
    });
}

criterion_group!(benches, benchmark_trend_predict, benchmark_compute_stats);
criterion_main!(benches);
