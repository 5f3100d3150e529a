use catalog_dash::api::GameRecord;
use catalog_dash::transform::{games_by_genre, top_rated};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const GENRES: &[&str] = &[
    "RPG", "Action", "Puzzle", "Strategy", "Racing", "Shooter", "Platformer", "Sim",
];

/// Deterministic synthetic catalog; genre picks cycle so counts stay stable.
fn catalog(n: usize) -> Vec<GameRecord> {
    (0..n)
        .map(|i| GameRecord {
            name: format!("game-{i}"),
            rating: (i % 100) as f64 / 10.0,
            genres: (0..=(i % 3))
                .map(|k| GENRES[(i + k) % GENRES.len()].to_string())
                .collect(),
        })
        .collect()
}

fn bench_transforms(c: &mut Criterion) {
    let games = catalog(10_000);

    c.bench_function("games_by_genre_10k", |b| {
        b.iter(|| games_by_genre(black_box(&games)))
    });

    c.bench_function("top_rated_10k", |b| {
        b.iter(|| top_rated(black_box(&games), black_box(5)))
    });
}

criterion_group!(benches, bench_transforms);
criterion_main!(benches);
