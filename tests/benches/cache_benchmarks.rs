//! # Lightwalletd Hot-Path Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | lw-01 Block Cache | append at tip with eviction, lookup, reorg overwrite |
//! | lw-02 Node RPC | raw block parsing into compact form |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lw_01_block_cache::{BlockCache, BlockCacheApi};
use lw_02_node_rpc::parser::fixtures::raw_chain;
use lw_02_node_rpc::{BlockParser, ZcashBlockParser};
use shared_types::ChainBuilder;

const START: u64 = 419_200;

fn bench_cache_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("lw-01-append");

    for capacity in [100u64, 1_000, 10_000] {
        let blocks = ChainBuilder::new(0).chain(START, 2 * capacity as usize);
        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("append_with_eviction", capacity),
            &blocks,
            |b, blocks| {
                b.iter(|| {
                    let cache = BlockCache::new(capacity);
                    for block in blocks {
                        cache.add(block.height, block).ok();
                    }
                    black_box(cache.window())
                })
            },
        );
    }

    group.finish();
}

fn bench_cache_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lw-01-lookup");

    let blocks = ChainBuilder::new(0).chain(START, 1_000);
    let cache = BlockCache::new(1_000);
    for block in &blocks {
        cache.add(block.height, block).ok();
    }

    group.bench_function("get_resident", |b| {
        let mut height = START;
        b.iter(|| {
            height = if height >= START + 999 { START } else { height + 1 };
            black_box(cache.get(height).ok())
        })
    });

    group.bench_function("get_above_tip", |b| {
        b.iter(|| black_box(cache.get(START + 5_000).ok()))
    });

    group.finish();
}

fn bench_cache_reorg(c: &mut Criterion) {
    let mut group = c.benchmark_group("lw-01-reorg");

    let main = ChainBuilder::new(0).chain(START, 1_000);
    let fork_point = START + 990;
    let parent = main[989].hash;
    let fork = ChainBuilder::new(1).block(fork_point, parent);

    group.bench_function("overwrite_last_ten", |b| {
        b.iter_batched(
            || {
                let cache = BlockCache::new(1_000);
                for block in &main {
                    cache.add(block.height, block).ok();
                }
                cache
            },
            |cache| black_box(cache.add(fork_point, &fork).ok()),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_block_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lw-02-parse");

    let raw = raw_chain(START, 64, [0u8; 32], 0);
    let bytes: usize = raw.iter().map(|b| b.bytes.len()).sum();
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("compact_from_raw", |b| {
        let parser = ZcashBlockParser;
        b.iter(|| {
            for (offset, block) in raw.iter().enumerate() {
                black_box(parser.parse(&block.bytes, START + offset as u64).ok());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cache_append,
    bench_cache_lookup,
    bench_cache_reorg,
    bench_block_parsing
);
criterion_main!(benches);
