use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use match_predictor::config::SimConfig;
use match_predictor::pipeline::{forecast_fixtures, round_robin};
use match_predictor::simulation::simulate_match;
use match_predictor::strength::estimate_strengths;
use match_predictor::HistoricalMatch;

fn sample_history(teams: usize, rounds: usize) -> Vec<HistoricalMatch> {
    let mut out = Vec::with_capacity(teams * teams * rounds);
    for r in 0..rounds {
        for h in 0..teams {
            for a in 0..teams {
                if h == a {
                    continue;
                }
                out.push(HistoricalMatch::new(
                    format!("Team {h}"),
                    format!("Team {a}"),
                    ((h + r) % 4) as u32,
                    ((a + 2 * r) % 3) as u32,
                ));
            }
        }
    }
    out
}

fn bench_estimate_strengths(c: &mut Criterion) {
    let history = sample_history(20, 10);
    c.bench_function("estimate_strengths_3800", |b| {
        b.iter(|| {
            let params = estimate_strengths(black_box(&history));
            black_box(params.map(|p| p.teams.len()));
        })
    });
}

fn bench_simulate_match(c: &mut Criterion) {
    c.bench_function("simulate_match_cap10", |b| {
        b.iter(|| {
            let d = simulate_match(black_box(1.7), black_box(1.1), 10).unwrap();
            black_box(d.outcome_probabilities());
        })
    });
}

fn bench_round_robin(c: &mut Criterion) {
    let history = sample_history(20, 2);
    let fixtures = round_robin(&history);
    let cfg = SimConfig::default();
    c.bench_function("forecast_round_robin_20", |b| {
        b.iter(|| {
            let out = forecast_fixtures(black_box(&history), &fixtures, &cfg);
            black_box(out.len());
        })
    });
}

criterion_group!(
    benches,
    bench_estimate_strengths,
    bench_simulate_match,
    bench_round_robin
);
criterion_main!(benches);
