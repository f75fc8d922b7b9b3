use chain_maps::chain_table::ChainTable;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

// Lookups against a single chain of `n` entries, the worst case for a
// bucket-chained table.
fn bench_collision_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_table_collision_get");
    for n in [8usize, 64, 512] {
        let mut m: ChainTable<usize, usize> = ChainTable::with_capacity(n * 2);
        for k in 0..n {
            m.insert(0, k, k).unwrap();
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut k = 0;
            b.iter(|| {
                k = (k + 1) % n;
                black_box(m.get(0, |&s| s == k));
            })
        });
    }
    group.finish();
}

// Cost of growing from the minimum capacity, relinking at every doubling.
fn bench_grow_from_minimum(c: &mut Criterion) {
    c.bench_function("chain_table_grow_16_to_64k", |b| {
        b.iter(|| {
            let mut m: ChainTable<u32, ()> = ChainTable::with_capacity(16);
            for k in 0..49_152u32 {
                m.insert(k, k, ()).unwrap();
            }
            black_box(m.capacity())
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_collision_chain, bench_grow_from_minimum
}
criterion_main!(benches);
