// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use narrative::model::NodeId;
use narrative::navigator::Navigator;
use narrative::query::{find_path_to_node, leaf_picks, suggest_nodes};
use narrative::source::{DataSource, TreeSource};

mod fixtures;

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<usize>().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<u64>().ok()).unwrap_or(default)
}

fn criterion() -> Criterion {
    let sample_size = env_usize("BENCH_SAMPLE_SIZE", 60).clamp(10, 200);
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

// Benchmark identity (keep stable):
// - Group names in this file: `navigator.select`, `query.find`, `query.picks`
// - Case IDs (the string after the `/`) must remain stable so results stay comparable.
fn benches_navigator(c: &mut Criterion) {
    let cases = [
        ("demo_steps", Arc::new(DataSource::demo_steps().expect("demo steps"))),
        ("demo_tree", Arc::new(DataSource::demo_tree().expect("demo tree"))),
        ("small", Arc::new(fixtures::tree(fixtures::Case::Small))),
        ("wide", Arc::new(fixtures::tree(fixtures::Case::Wide))),
        ("deep", Arc::new(fixtures::tree(fixtures::Case::Deep))),
    ];

    {
        let mut group = c.benchmark_group("navigator.select");
        for (case_id, source) in &cases {
            let roots: Vec<NodeId> = source.roots().iter().map(|root| root.id().clone()).collect();
            group.bench_function(*case_id, |b| {
                let mut navigator = Navigator::new(source.clone());
                let mut i = 0usize;
                b.iter(|| {
                    i = i.wrapping_add(1);
                    let root = &roots[i % roots.len()];
                    black_box(navigator.select(0, black_box(root)));
                    black_box(navigator.aggregate_probability())
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("query.find");
        for (case_id, target) in [
            ("wide_id", fixtures::last_at(fixtures::Case::Wide, 4).as_str().to_owned()),
            ("wide_name", "node 5.5.5.5.5".to_owned()),
            ("deep_contains", "1.1.1.1.1".to_owned()),
        ] {
            let source = match case_id {
                "wide_id" | "wide_name" => fixtures::tree(fixtures::Case::Wide),
                _ => fixtures::tree(fixtures::Case::Deep),
            };
            group.bench_function(case_id, move |b| {
                b.iter(|| black_box(find_path_to_node(&source, black_box(&target))))
            });
        }

        let source = fixtures::tree(fixtures::Case::Small);
        group.bench_function("small_suggest", move |b| {
            b.iter(|| black_box(suggest_nodes(&source, black_box("nod 2.1"), 5)))
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("query.picks");
        for (case_id, source) in &cases {
            group.bench_function(*case_id, |b| b.iter(|| black_box(leaf_picks(source.as_ref(), 3))));
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = benches_navigator
}
criterion_main!(benches);
