//! Throughput benchmarks for the storage engine's write and read paths.
use config::EngineConfig;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use engine::Engine;
use tempfile::tempdir;

fn bench_set(c: &mut Criterion) {
    c.bench_function("engine_set_distinct_keys", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let engine = Engine::open(EngineConfig::new(dir.path(), 10_000, 10_000)).unwrap();
                (dir, engine, 0u64)
            },
            |(dir, mut engine, mut i)| {
                i += 1;
                let key = format!("key{i}").into_bytes();
                engine.set(key, b"value".to_vec()).unwrap();
                black_box(&engine);
                drop(dir);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(EngineConfig::new(dir.path(), 10_000, 10_000)).unwrap();
    for i in 0..1000 {
        engine
            .set(format!("key{i}").into_bytes(), b"value".to_vec())
            .unwrap();
    }

    c.bench_function("engine_get_from_memtable", |b| {
        b.iter(|| black_box(engine.get(b"key500").unwrap()));
    });
}

fn bench_get_from_sst(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(EngineConfig::new(dir.path(), 50, 10_000)).unwrap();
    for i in 0..500 {
        engine
            .set(format!("key{i}").into_bytes(), b"value".to_vec())
            .unwrap();
    }

    c.bench_function("engine_get_from_sst", |b| {
        b.iter(|| black_box(engine.get(b"key10").unwrap()));
    });
}

criterion_group!(benches, bench_set, bench_get_hit, bench_get_from_sst);
criterion_main!(benches);
