use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridding_kernel::params::find_kernel;
use gridding_kernel::{fit_piecewise, select_kernel, EsKernel, KERNEL_DB};

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_piecewise");
    for w in [4usize, 8, 16] {
        let index = find_kernel(w, 2.0).unwrap_or(0);
        let shape = EsKernel::from_params(&KERNEL_DB[index]);
        group.bench_with_input(BenchmarkId::from_parameter(w), &w, |b, &w| {
            b.iter(|| fit_piecewise(shape.as_fn(), black_box(w), w + 3))
        });
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    c.bench_function("select_kernel", |b| {
        b.iter(|| select_kernel(black_box(200)))
    });
}

fn bench_eval_taps(c: &mut Criterion) {
    let kernel = select_kernel(black_box(200)).expect("table entry 200");
    c.bench_function("eval_taps", |b| b.iter(|| kernel.eval_taps(black_box(0.37))));
}

criterion_group!(benches, bench_fit, bench_select, bench_eval_taps);
criterion_main!(benches);
