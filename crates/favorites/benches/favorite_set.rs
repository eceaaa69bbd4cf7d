//! Benchmarks for the favorites list
//!
//! Run with: cargo bench --package favorites
//!
//! Every mutation re-reads and re-writes the whole list, so decode/encode
//! cost on a large list is what a user with many favorites pays per tap.

use catalog::{Movie, MovieId};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use favorites::FavoriteSet;

fn movie(id: MovieId) -> Movie {
    Movie {
        id,
        title: format!("Movie number {id}"),
        overview: "A long enough overview to look like a real record. ".repeat(4),
        poster_path: Some(format!("/poster{id}.jpg")),
        release_date: chrono::NaiveDate::from_ymd_opt(1990 + (id % 30) as i32, 6, 1),
        vote_average: (id % 100) as f64 / 10.0,
        vote_count: id * 3,
        popularity: id as f64 * 0.7,
        original_language: "en".to_string(),
    }
}

fn build_set(size: MovieId) -> FavoriteSet {
    let mut set = FavoriteSet::new();
    for id in 1..=size {
        set.insert(movie(id));
    }
    set
}

fn bench_decode(c: &mut Criterion) {
    let json = build_set(500).to_json().unwrap();

    c.bench_function("favorite_set_from_json_500", |b| {
        b.iter(|| {
            let set = FavoriteSet::from_json(black_box(&json)).unwrap();
            black_box(set)
        })
    });
}

fn bench_read_modify_write(c: &mut Criterion) {
    let json = build_set(500).to_json().unwrap();

    c.bench_function("favorite_set_remove_cycle_500", |b| {
        b.iter(|| {
            let mut set = FavoriteSet::from_json(black_box(&json)).unwrap();
            set.remove(black_box(250));
            black_box(set.to_json().unwrap())
        })
    });
}

criterion_group!(benches, bench_decode, bench_read_modify_write);
criterion_main!(benches);
