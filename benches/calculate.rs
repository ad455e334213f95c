use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glicko2_period::{InternalRating, RatingPeriod, Score};

fn build_period(players: usize, games_per_player: usize) -> RatingPeriod<usize> {
    let mut period = RatingPeriod::new(0.5).unwrap();
    let ids: Vec<_> = (0..players)
        .map(|i| {
            let pre = InternalRating::new(
                (i % 17) as f64 / 8.0 - 1.0,
                0.3 + (i % 7) as f64 / 5.0,
                0.06,
            )
            .unwrap();
            period.add_player(i, pre).unwrap()
        })
        .collect();

    for round in 1..=games_per_player {
        for i in 0..players {
            let j = (i + round) % players;
            if i == j {
                continue;
            }
            let score = match (i * 31 + j * 17) % 3 {
                0 => Score::Loss,
                1 => Score::Draw,
                _ => Score::Win,
            };
            period.add_match(ids[i], ids[j], score).unwrap();
        }
    }
    period
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");
    for players in [100, 1_000, 10_000] {
        let period = build_period(players, 5);
        group.bench_with_input(BenchmarkId::from_parameter(players), &period, |b, period| {
            b.iter(|| {
                let mut period = period.clone();
                period.calculate().unwrap();
                black_box(period)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
