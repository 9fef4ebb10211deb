use cmdcolor::reduce::{reduce_to_16, reduce_to_256};
use cmdcolor::{ColorIndex, ColorValue, BG_RED, BLUE, BRIGHT, RESET_BRIGHT};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn run_benchmarks(c: &mut Criterion) {
    // Sample the 24-bit colors along a diagonal through the RGB cube.
    let colors: Vec<_> = (0..=255_u8)
        .map(|n| ColorIndex::rgb(n, n.wrapping_mul(7), n.wrapping_mul(13)))
        .collect();

    let mut group = c.benchmark_group("reduce");

    group.bench_function("to-256", |b| {
        b.iter(|| {
            for color in &colors {
                black_box(reduce_to_256(black_box(*color)));
            }
        })
    });

    group.bench_function("to-16", |b| {
        b.iter(|| {
            for color in &colors {
                black_box(reduce_to_16(black_box(*color)));
            }
        })
    });

    group.bench_function("to-16-via-256", |b| {
        b.iter(|| {
            for color in &colors {
                black_box(reduce_to_16(reduce_to_256(black_box(*color))));
            }
        })
    });

    group.finish();

    c.bench_function("combine", |b| {
        b.iter(|| {
            black_box(BLUE)
                .combine(&BRIGHT)
                .combine(&BG_RED)
                .combine(&BRIGHT)
                .combine(&RESET_BRIGHT)
                .combine(&ColorValue::fg(208))
        })
    });
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);
