//! Performance benchmarks for svsim
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::io;
use svsim::core::dna::random_bases;
use svsim::formats::assemble_genome;
use svsim::{
    assemble_contig, check_variations, simulate_genome, validate_variant_set, Reference, Variant,
    VariantSet,
};

const CONTIG_LEN: usize = 1_000_000;

/// Synthetic contig with evenly spaced variants of every applicable kind
fn synthetic(contig: &str, count: u64) -> (Vec<u8>, Vec<Variant>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    let seq = random_bases(CONTIG_LEN, &mut rng);
    let step = CONTIG_LEN as u64 / (count + 1);
    let variants = (0..count)
        .map(|i| {
            let pos = (i + 1) * step;
            match i % 4 {
                0 => Variant::insertion(contig, pos, 50),
                1 => Variant::deletion(contig, pos, 50),
                2 => Variant::duplication(contig, pos, 50, 3),
                _ => Variant::transversion(contig, pos, 50),
            }
        })
        .collect();
    (seq, variants)
}

/// Benchmark overlap validation
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_variations");
    for count in [100u64, 1_000, 10_000] {
        let (_, variants) = synthetic("chr1", count);
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &variants, |b, variants| {
            b.iter(|| {
                let variants = black_box(variants.clone());
                check_variations("chr1", Some(CONTIG_LEN as u64), variants).unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmark single contig assembly
fn bench_assembly(c: &mut Criterion) {
    let (seq, variants) = synthetic("chr1", 1_000);
    let reference = Reference::from_contigs([("chr1", seq)]).unwrap();
    let variants = check_variations("chr1", Some(CONTIG_LEN as u64), variants).unwrap();

    let mut group = c.benchmark_group("assemble_contig");
    group.throughput(Throughput::Bytes(CONTIG_LEN as u64));
    group.bench_function("1mb_1000_variants", |b| {
        b.iter(|| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
            let donor =
                assemble_contig(&reference, "chr1", black_box(&variants), &mut rng).unwrap();
            black_box(donor)
        })
    });
    group.finish();
}

/// Benchmark parallel assembly across contigs
fn bench_parallel_assembly(c: &mut Criterion) {
    let mut contigs = Vec::new();
    let mut set = VariantSet::new();
    for i in 0..8 {
        let name = format!("chr{}", i + 1);
        let (seq, variants) = synthetic(&name, 500);
        for variant in variants {
            set.push(variant);
        }
        contigs.push((name, seq));
    }
    let reference = Reference::from_contigs(contigs).unwrap();
    let set = validate_variant_set(set, &reference).unwrap();

    let mut group = c.benchmark_group("assemble_genome");
    group.sample_size(20);
    for threads in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| black_box(assemble_genome(&reference, &set, 7, threads).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark genome simulation
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_genome");
    group.throughput(Throughput::Bytes(CONTIG_LEN as u64));
    group.bench_function("1mb", |b| {
        b.iter(|| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
            let frequencies = [0.3, 0.2, 0.2, 0.3];
            simulate_genome(&mut io::sink(), CONTIG_LEN as u64, frequencies, &mut rng).unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_validation,
    bench_assembly,
    bench_parallel_assembly,
    bench_simulation
);
criterion_main!(benches);
