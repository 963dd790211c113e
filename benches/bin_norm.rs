use criterion::{black_box, criterion_group, criterion_main, Criterion};
use levelplot::levels::{auto_levels, AutoLevelOptions};
use levelplot::{BinNorm, Extend};
use ndarray::Array2;

fn mk_field(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        ((i as f64 * 0.05).sin() + (j as f64 * 0.03).cos()) * 10.0
    })
}

fn bench_color_indices(c: &mut Criterion) {
    let field = mk_field(512, 512);
    let levels = [-20.0, -10.0, -5.0, -2.0, 0.0, 2.0, 5.0, 10.0, 20.0];
    let norm = BinNorm::new(&levels, Extend::Both, 256).unwrap();
    let flat: Vec<f64> = field.iter().copied().collect();

    c.bench_function("color_indices_slice", |b| {
        b.iter(|| black_box(norm.color_indices(black_box(&flat)).len()))
    });

    c.bench_function("color_indices_array", |b| {
        b.iter(|| black_box(norm.color_indices_array(black_box(field.view())).len()))
    });
}

fn bench_auto_levels(c: &mut Criterion) {
    let options = AutoLevelOptions::default();
    c.bench_function("auto_levels", |b| {
        b.iter(|| auto_levels(black_box(-13.7), black_box(42.1), 11, &options).unwrap())
    });
}

criterion_group!(benches, bench_color_indices, bench_auto_levels);
criterion_main!(benches);
