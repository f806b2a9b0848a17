//! Performance benchmarks for the hash engine
//!
//! Measures per-algorithm throughput and the difference between the
//! sequential and parallel strategies for multi-algorithm runs.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use filehash_core::hashing::{HashAlgorithm, HashCalculator, HashConfig, StrategyHint};
use filehash_core::progress::NullProvider;
use std::hint::black_box;

fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 7 % 251) as u8).collect()
}

fn format_size(size: usize) -> String {
    if size >= 1_048_576 {
        format!("{}MB", size / 1_048_576)
    } else {
        format!("{}KB", size / 1024)
    }
}

/// Single algorithm throughput across payload sizes
fn benchmark_hash_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_algorithms");
    let calculator = HashCalculator::new();

    for size in [1_024, 102_400, 1_048_576, 10_485_760] {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for algorithm in HashAlgorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.id(), format_size(size)),
                &data,
                |b, data| {
                    b.iter(|| {
                        let result = calculator
                            .calculate_bytes(algorithm, black_box(data))
                            .unwrap();
                        black_box(result.hash);
                    })
                },
            );
        }
    }

    group.finish();
}

/// Three algorithms at once, one strategy per hint
fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    let algorithms = [HashAlgorithm::Sha512, HashAlgorithm::Sha3_256, HashAlgorithm::Blake2b];

    for size in [262_144, 4_194_304, 33_554_432] {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for (label, hint) in [
            ("sequential", StrategyHint::PreferSequential),
            ("parallel", StrategyHint::PreferParallel),
        ] {
            let calculator = HashCalculator::with_hint(hint);
            group.bench_with_input(BenchmarkId::new(label, format_size(size)), &data, |b, data| {
                b.iter(|| {
                    let digests = calculator
                        .compute_digests(black_box(data), &algorithms, &NullProvider)
                        .unwrap();
                    black_box(digests);
                })
            });
        }
    }

    group.finish();
}

/// Effect of the streaming chunk size on a multi-algorithm run
fn benchmark_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_size");
    let data = generate_test_data(4_194_304);
    let algorithms = [HashAlgorithm::Md5, HashAlgorithm::Sha256];
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [1024, 8192, 65_536, 1_048_576] {
        let calculator = HashCalculator::new().with_config(HashConfig::with_chunk_size(chunk_size));
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &data, |b, data| {
            b.iter(|| {
                black_box(
                    calculator
                        .compute_digests(black_box(data), &algorithms, &NullProvider)
                        .unwrap(),
                );
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_hash_algorithms,
    benchmark_strategies,
    benchmark_chunk_sizes
);
criterion_main!(benches);
