//! Benchmarks for dir-walker
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dir_walker::{IgnoreMatcher, Walker};
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn benchmark_ignore_matching(c: &mut Criterion) {
    let matcher = IgnoreMatcher::from_lines("node_modules\n.git\ntarget\n.\n").unwrap();

    c.bench_function("ignore_match_hit", |b| {
        b.iter(|| black_box(matcher.is_match_str("./web/app/node_modules/react/index.js")))
    });

    c.bench_function("ignore_match_miss", |b| {
        b.iter(|| black_box(matcher.is_match_str("./crates/walker/src/concurrent.rs")))
    });
}

/// 16 top-level dirs x 16 subdirs x 8 files
fn build_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..16 {
        for j in 0..16 {
            let sub = dir.path().join(format!("d{}/s{}", i, j));
            fs::create_dir_all(&sub).unwrap();
            for k in 0..8 {
                fs::write(sub.join(format!("f{}.txt", k)), b"x").unwrap();
            }
        }
    }
    dir
}

fn benchmark_walk_strategies(c: &mut Criterion) {
    let tree = build_tree();
    let walker = Walker::new();

    c.bench_function("walk_concurrent", |b| {
        b.iter(|| {
            let count = Arc::new(AtomicU64::new(0));
            let files = Arc::clone(&count);
            walker
                .walk(
                    tree.path(),
                    move |_| {
                        files.fetch_add(1, Ordering::Relaxed);
                    },
                    |_| {},
                    None,
                )
                .unwrap();
            black_box(count.load(Ordering::Relaxed));
        })
    });

    c.bench_function("walk_pooled_4", |b| {
        b.iter(|| {
            let count = Arc::new(AtomicU64::new(0));
            let files = Arc::clone(&count);
            walker
                .walk_pooled(
                    tree.path(),
                    move |_| {
                        files.fetch_add(1, Ordering::Relaxed);
                    },
                    |_| {},
                    None,
                    4,
                )
                .unwrap();
            black_box(count.load(Ordering::Relaxed));
        })
    });

    c.bench_function("walk_linear", |b| {
        b.iter(|| {
            let mut count = 0u64;
            walker
                .walk_linear(tree.path(), |_| count += 1, |_| {}, None, 0)
                .unwrap();
            black_box(count);
        })
    });
}

criterion_group!(benches, benchmark_ignore_matching, benchmark_walk_strategies);
criterion_main!(benches);
