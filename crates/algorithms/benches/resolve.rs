//! Benchmarks for whole-grid resolution

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispgrid_algorithms::interpolation::{resolve_grid, ResolveParams};
use dispgrid_core::{Grid, InterpolationConfig, SamplePoint};

fn create_samples(length: f64, depth: f64, per_axis: usize) -> Vec<SamplePoint> {
    // Slightly sheared lattice so most nodes fall strictly inside triangles
    let mut samples = Vec::with_capacity(per_axis * per_axis);
    for i in 0..per_axis {
        for j in 0..per_axis {
            let fx = (i as f64 + 0.37 * ((j * 7) % 5) as f64 / 5.0) / per_axis as f64;
            let fz = (j as f64 + 0.41 * ((i * 3) % 7) as f64 / 7.0) / per_axis as f64;
            let x = -length / 2.0 + fx * length;
            let z = fz * depth;
            samples.push(SamplePoint::new(x, z, (x * 0.1).sin() + z * 0.05));
        }
    }
    samples
}

fn bench_resolve_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_grid");
    let config = InterpolationConfig::default();

    for length in [40.0, 120.0, 400.0].iter() {
        let samples = create_samples(*length, -30.0, 60);

        group.bench_with_input(BenchmarkId::from_parameter(length), length, |b, &length| {
            b.iter(|| {
                let mut grid = Grid::build(length, -30.0, &config).unwrap();
                let params = ResolveParams::for_grid(&grid, &config);
                resolve_grid(&mut grid, black_box(&samples), &params)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_grid);
criterion_main!(benches);
