use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use densvd::{DynMatrix, Svd, SvdOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(i: usize, j: usize) -> f64 {
    ((i + 1) * 10 + j + 1) as f64 + if i == j { 3.0 } else { 0.0 }
}

fn densvd_mat(m: usize, n: usize) -> DynMatrix<f64> {
    DynMatrix::from_fn(m, n, entry)
}

fn nalgebra_mat(m: usize, n: usize) -> nalgebra::DMatrix<f64> {
    nalgebra::DMatrix::from_fn(m, n, entry)
}

// ---------------------------------------------------------------------------
// Full decomposition
// ---------------------------------------------------------------------------

fn svd_square(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd_square");

    for n in [4, 16, 64] {
        g.bench_with_input(BenchmarkId::new("densvd", n), &n, |b, &n| {
            let a = densvd_mat(n, n);
            b.iter(|| std::hint::black_box(&a).svd())
        });

        g.bench_with_input(BenchmarkId::new("nalgebra", n), &n, |b, &n| {
            let a = nalgebra_mat(n, n);
            b.iter(|| std::hint::black_box(&a).clone().svd(true, true))
        });
    }

    g.finish();
}

fn svd_tall(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd_tall_100x10");

    g.bench_function("densvd", |b| {
        let a = densvd_mat(100, 10);
        b.iter(|| std::hint::black_box(&a).svd())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_mat(100, 10);
        b.iter(|| std::hint::black_box(&a).clone().svd(true, true))
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Singular values only
// ---------------------------------------------------------------------------

fn singular_values_32(c: &mut Criterion) {
    let mut g = c.benchmark_group("singular_values_32x32");

    g.bench_function("densvd", |b| {
        let a = densvd_mat(32, 32);
        b.iter(|| std::hint::black_box(&a).singular_values_only())
    });

    g.bench_function("nalgebra", |b| {
        let a = nalgebra_mat(32, 32);
        b.iter(|| std::hint::black_box(&a).singular_values())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Factor accumulation
// ---------------------------------------------------------------------------

fn accumulation(c: &mut Criterion) {
    let mut g = c.benchmark_group("accumulation_128x96");
    let a = densvd_mat(128, 96);

    g.bench_function("serial", |b| {
        let opts = SvdOptions::default();
        b.iter(|| Svd::with_options(std::hint::black_box(&a), &opts))
    });

    #[cfg(feature = "parallel")]
    g.bench_function("parallel", |b| {
        let opts = SvdOptions::default().with_parallel_accumulation(true);
        b.iter(|| Svd::with_options(std::hint::black_box(&a), &opts))
    });

    g.finish();
}

criterion_group!(benches, svd_square, svd_tall, singular_values_32, accumulation);
criterion_main!(benches);
