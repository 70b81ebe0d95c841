//! Estimator benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench estimators
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use diffasym::analysis::{
    analyze_pairwise, asymmetry_function, ks_test, shift_function, weighted_ks_test,
    wilcoxon_rank_sum, AsymmetryConfig, PairwiseConfig, ShiftConfig,
};
use diffasym::data::{generate, Family, SampleSpec};
use diffasym::statistics::{gaussian_kde, hd_deciles, pairwise_differences};
use diffasym::{Report, TwoGroups};

fn groups(n: usize) -> TwoGroups {
    let spec1 = SampleSpec {
        family: Family::StudentT { df: 30.0 },
        size: n,
        target: 5.001,
    };
    let spec2 = SampleSpec {
        family: Family::ChiSquared { df: 30.0 },
        size: n,
        target: 5.0,
    };
    let g1 = generate(&spec1, &mut Xoshiro256PlusPlus::seed_from_u64(1)).unwrap();
    let g2 = generate(&spec2, &mut Xoshiro256PlusPlus::seed_from_u64(2)).unwrap();
    TwoGroups::new(g1, g2)
}

fn bench_quantiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("hd_deciles");
    for n in [50, 200, 1000] {
        let data = groups(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data.group1, |b, g| {
            b.iter(|| hd_deciles(black_box(g)).unwrap());
        });
    }
    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let data = groups(50);
    let mut group = c.benchmark_group("pairwise");
    group.bench_function("differences", |b| {
        b.iter(|| pairwise_differences(black_box(&data.group1), black_box(&data.group2)));
    });

    let diffs = pairwise_differences(&data.group1, &data.group2);
    group.bench_function("kde", |b| {
        b.iter(|| gaussian_kde(black_box(&diffs)).unwrap());
    });

    group.sample_size(20);
    let config = PairwiseConfig {
        bootstrap_samples: 200,
        ..PairwiseConfig::default()
    };
    group.bench_function("median_bootstrap_200", |b| {
        b.iter(|| analyze_pairwise(&data.group1, &data.group2, &config, 7).unwrap());
    });
    group.finish();
}

fn bench_bootstrap_stages(c: &mut Criterion) {
    let data = groups(50);
    let mut group = c.benchmark_group("bootstrap_stages");
    group.sample_size(10);

    let shift = ShiftConfig::default();
    group.bench_function("shift_function", |b| {
        b.iter(|| shift_function(&data, &shift, 11).unwrap());
    });

    let asymmetry = AsymmetryConfig::default();
    group.bench_function("asymmetry_function", |b| {
        b.iter(|| asymmetry_function(&data.group1, &data.group2, &asymmetry, 13).unwrap());
    });
    group.finish();
}

fn bench_classical(c: &mut Criterion) {
    let data = groups(50);
    let mut group = c.benchmark_group("classical");
    group.bench_function("wilcoxon_exact", |b| {
        b.iter(|| wilcoxon_rank_sum(&data.group1, &data.group2).unwrap());
    });
    group.bench_function("ks_exact", |b| {
        b.iter(|| ks_test(&data.group1, &data.group2).unwrap());
    });
    group.sample_size(20);
    group.bench_function("weighted_ks_1000", |b| {
        b.iter(|| weighted_ks_test(&data.group1, &data.group2, 1000, 17).unwrap());
    });
    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    group.sample_size(10);
    group.bench_function("quick", |b| {
        b.iter(|| black_box(Report::quick().run().unwrap().result.pairwise.count));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_quantiles,
    bench_pairwise,
    bench_bootstrap_stages,
    bench_classical,
    bench_report
);
criterion_main!(benches);
