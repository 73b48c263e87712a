//! Performance benchmarks for selector recompute and store lookups.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use trendline::{
    filter_trends, search_trends, CategoryFilter, DraftInput, Result, Session, Trend,
    TrendCategory, TrendFeed,
};

struct EmptyFeed;

impl TrendFeed for EmptyFeed {
    fn fetch_trends(&self) -> Result<Vec<Trend>> {
        Ok(Vec::new())
    }
}

fn make_trends(n: usize) -> Vec<Trend> {
    (0..n)
        .map(|i| Trend {
            id: format!("t{}", i),
            name: format!("Trend topic {}", i),
            category: TrendCategory::ALL[i % TrendCategory::ALL.len()],
            growth: (i % 100) as f64,
            description: String::new(),
            platform: "instagram".to_string(),
            volume: i as u64,
        })
        .collect()
}

/// Selectors are recomputed on every keystroke; measure that path across
/// working-list sizes.
fn bench_selector_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_recompute");

    for size in [10, 100, 1000, 5000] {
        let trends = make_trends(size);

        group.bench_with_input(BenchmarkId::new("combined", size), &trends, |b, trends| {
            b.iter(|| {
                black_box(filter_trends(
                    trends,
                    CategoryFilter::Only(TrendCategory::Tech),
                    "topic 7",
                ));
            });
        });

        group.bench_with_input(BenchmarkId::new("search", size), &trends, |b, trends| {
            b.iter(|| {
                black_box(search_trends(trends, "topic 42"));
            });
        });
    }

    group.finish();
}

/// Membership checks drive the save indicator on every card render.
fn bench_store_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_lookups");

    for size in [10, 100, 1000] {
        let session = Session::in_memory(Arc::new(EmptyFeed)).unwrap();
        for trend in make_trends(size) {
            session.trends().save(&trend);
        }
        let draft_ids: Vec<String> = (0..size)
            .map(|i| {
                session
                    .drafts()
                    .create(DraftInput::new(format!("draft {}", i)))
                    .id
            })
            .collect();
        let probe = draft_ids[size / 2].clone();

        group.bench_with_input(
            BenchmarkId::new("is_saved", size),
            &session,
            |b, session| {
                b.iter(|| {
                    black_box(session.trends().is_saved("t5"));
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("draft_get", size),
            &session,
            |b, session| {
                b.iter(|| {
                    black_box(session.drafts().get(&probe));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_selector_recompute, bench_store_lookups);
criterion_main!(benches);
