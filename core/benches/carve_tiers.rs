use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use komichi_core::{GameConfig, PathCarver, WindingPathCarver};

fn carve_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("carve");

    for size in [(5u8, 5u8), (7, 9), (12, 16)] {
        let id = BenchmarkId::from_parameter(format!("{}x{}", size.0, size.1));
        group.bench_with_input(id, &size, |b, &size| {
            let config = GameConfig::new(size);
            b.iter(|| WindingPathCarver::new(0x6B6F_6D69).carve(config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, carve_tiers);
criterion_main!(benches);
