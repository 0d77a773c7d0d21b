use criterion::{black_box, criterion_group, criterion_main, Criterion};

use genechunk::chunks::{plan, SequenceSizes};

fn human_like_sizes() -> SequenceSizes {
    let mut entries: Vec<(String, u64)> = (1..=22)
        .map(|idx| (format!("chr{}", idx), 250_000_000 - idx * 8_000_000))
        .collect();
    // many small unplaced scaffolds
    for idx in 0..2000 {
        entries.push((format!("scaffold_{}", idx), 1_000 + idx * 997));
    }
    SequenceSizes::from_entries(entries)
}

fn plan_bench(c: &mut Criterion) {
    let sizes = human_like_sizes();
    c.bench_function("plan human-like genome", |b| {
        b.iter(|| {
            let plan = plan(black_box(&sizes), 2_500_000, 500_000).unwrap();
            assert!(!plan.is_empty());
        })
    });
}

criterion_group!(planner, plan_bench);
criterion_main!(planner);
