//! Benchmarks for the partitioner and the nested layout.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marketmap_layout::{
    layout_groups, partition, DeviceProfile, GroupInput, GroupMap, LayoutConfig, LeafRecord,
    RectBounds,
};

/// Weights with a long tail, sorted descending like real caps.
fn tail_weights(n: usize) -> Vec<f64> {
    (1..=n).map(|i| 1e6 / i as f64).collect()
}

fn market(groups: usize, per_group: usize) -> GroupMap {
    let mut map = GroupMap::new();
    for g in 0..groups {
        let items = (0..per_group)
            .map(|i| {
                let change = ((g * 31 + i * 7) % 200) as f64 / 20.0 - 5.0;
                LeafRecord::new(format!("{g}-{i}"), format!("Stock {i}"), 1e9 / (i + 1) as f64, change)
            })
            .collect();
        map.insert(format!("sector-{g}"), GroupInput::new(format!("Sector {g}"), items));
    }
    map
}

fn bench_partition_10(c: &mut Criterion) {
    let weights = tail_weights(10);
    let bounds = RectBounds::from_size(800.0, 600.0);

    c.bench_function("partition_10", |b| {
        b.iter(|| partition(black_box(&weights), black_box(bounds), 1.0));
    });
}

fn bench_partition_1000(c: &mut Criterion) {
    let weights = tail_weights(1000);
    let bounds = RectBounds::from_size(1920.0, 1080.0);

    c.bench_function("partition_1000", |b| {
        b.iter(|| partition(black_box(&weights), black_box(bounds), 1.0));
    });
}

fn bench_nested_desktop(c: &mut Criterion) {
    let groups = market(30, 50);
    let config = LayoutConfig::for_profile(DeviceProfile::Desktop, 1920.0, 1080.0);

    c.bench_function("nested_30x50_desktop", |b| {
        b.iter(|| layout_groups(black_box(&groups), black_box(&config)));
    });
}

fn bench_nested_mobile(c: &mut Criterion) {
    let groups = market(30, 50);
    let config = LayoutConfig::for_viewport(390.0, 844.0);

    c.bench_function("nested_30x50_mobile", |b| {
        b.iter(|| layout_groups(black_box(&groups), black_box(&config)));
    });
}

criterion_group!(
    benches,
    bench_partition_10,
    bench_partition_1000,
    bench_nested_desktop,
    bench_nested_mobile,
);
criterion_main!(benches);
