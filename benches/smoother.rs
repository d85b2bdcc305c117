//! Benchmarks for the EOT filter and the full smoother pipeline.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use climtrace::algorithms::EotFilter;
use climtrace::config::SmootherConfig;
use climtrace::engine::MovingWindowSmoother;
use climtrace::primitives::{TimeSeries, UncertainTimeSeries};

/// A warming-trend record with seeded Gaussian noise, so runs are
/// comparable across machines.
fn noisy_record(start: i32, end: i32) -> UncertainTimeSeries<f64> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let noise = Normal::new(0.0, 0.1).unwrap();
    let values: Vec<f64> = (start..=end)
        .map(|y| 0.008 * f64::from(y - start) + noise.sample(&mut rng))
        .collect();
    UncertainTimeSeries::new(
        TimeSeries::new(start, values).unwrap(),
        TimeSeries::constant(start, end, 0.05).unwrap(),
    )
    .unwrap()
}

fn bench_eot_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("eot_filter");
    for n in [100usize, 200, 400] {
        let record = noisy_record(1850, 1850 + n as i32 - 1);
        let filter = EotFilter::new(20, 3).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &record, |b, record| {
            b.iter(|| filter.run(black_box(&record.values)).unwrap());
        });
    }
    group.finish();
}

fn bench_smoother_pipeline(c: &mut Criterion) {
    let record = noisy_record(1850, 2023);
    let config = SmootherConfig {
        start_year: 1850,
        end_year: 2040,
        ..SmootherConfig::default()
    };
    let smoother = MovingWindowSmoother::new(config).unwrap();
    c.bench_function("smoother_pipeline_1850_2040", |b| {
        b.iter(|| smoother.run(black_box(&record)).unwrap());
    });
}

criterion_group!(benches, bench_eot_filter, bench_smoother_pipeline);
criterion_main!(benches);
