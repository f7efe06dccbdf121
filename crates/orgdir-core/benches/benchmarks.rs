//! Benchmarks for tree reconstruction and the radius scan.
//!
//! Run with: cargo bench -p orgdir-core

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use orgdir_core::prelude::*;
use orgdir_core::tree::{build_full, build_two_level};
use orgdir_core::Activity;
use std::hint::black_box;
use std::sync::Arc;

/// A forest of `roots` roots, each with 4 children and 2 grandchildren per child.
fn activity_rows(roots: usize) -> Vec<Activity> {
    let mut rows = Vec::new();
    let mut next_id = 1;
    let mut push = |rows: &mut Vec<Activity>, parent_id: Option<i64>| {
        let id = next_id;
        next_id += 1;
        rows.push(Activity {
            id,
            name: format!("activity-{id}"),
            parent_id,
            organization_id: 1,
        });
        id
    };
    for _ in 0..roots {
        let root = push(&mut rows, None);
        for _ in 0..4 {
            let child = push(&mut rows, Some(root));
            for _ in 0..2 {
                push(&mut rows, Some(child));
            }
        }
    }
    rows
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("activity_tree");

    for roots in [10, 100, 1_000] {
        let rows = activity_rows(roots);
        group.bench_with_input(BenchmarkId::new("two_level", roots), &rows, |b, rows| {
            b.iter(|| black_box(build_two_level(black_box(rows))))
        });
        group.bench_with_input(BenchmarkId::new("full", roots), &rows, |b, rows| {
            b.iter(|| black_box(build_full(black_box(rows), 3)))
        });
    }
    group.finish();
}

fn bench_radius(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("radius_scan");

    for buildings in [100, 1_000, 10_000] {
        let directory = Directory::new(Arc::new(MemoryStore::new()));
        rt.block_on(async {
            for i in 0..buildings {
                // Spread points over a ~1 degree square around Moscow.
                let lat = 55.0 + (i % 100) as f64 * 0.01;
                let lon = 37.0 + (i / 100) as f64 * 0.01;
                let entry = NewEntry {
                    address: format!("Building {i}"),
                    latitude: lat,
                    longitude: lon,
                    activity_names: Vec::new(),
                    organization_name: format!("Org {i}"),
                    phone_numbers: Vec::new(),
                };
                directory.add_data(&entry).await.expect("seed");
            }
        });

        let query = RadiusQuery {
            radius: 10.0,
            latitude: 55.5,
            longitude: 37.5,
        };
        group.bench_with_input(BenchmarkId::new("10km", buildings), &query, |b, query| {
            b.iter(|| {
                let hits = rt
                    .block_on(directory.organizations_by_radius(black_box(query)))
                    .expect("radius");
                black_box(hits.len())
            })
        });
    }
    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    c.bench_function("distance_km", |b| {
        b.iter(|| {
            distance_km(
                black_box(55.7558),
                black_box(37.6173),
                black_box(59.9343),
                black_box(30.3351),
                orgdir_core::EARTH_RADIUS_KM,
            )
        })
    });
}

criterion_group!(benches, bench_tree, bench_radius, bench_distance);
criterion_main!(benches);
