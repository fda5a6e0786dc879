use chain_table::{ChainTable, HashedPolicy};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

type Elem = (String, u64);
type Table = ChainTable<HashedPolicy<Elem, str>>;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn elem_key(e: &Elem) -> &str {
    &e.0
}

fn new_table(capacity: usize) -> Table {
    ChainTable::new(capacity, HashedPolicy::new(elem_key))
}

fn bench_insert_growing(c: &mut Criterion) {
    c.bench_function("chain_table_insert_10k_from_1", |b| {
        b.iter_batched(
            || new_table(1),
            |mut t| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    black_box(t.insert((key(x), i as u64)));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized(c: &mut Criterion) {
    c.bench_function("chain_table_insert_10k_presized", |b| {
        b.iter_batched(
            || new_table(10_000),
            |mut t| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    black_box(t.insert((key(x), i as u64)));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_overwrite(c: &mut Criterion) {
    c.bench_function("chain_table_overwrite", |b| {
        let mut t = new_table(1);
        let keys: Vec<_> = lcg(3).take(1_000).map(key).collect();
        for k in &keys {
            let _ = t.insert((k.clone(), 0));
        }
        let mut it = keys.iter().cycle();
        let mut n = 0u64;
        b.iter(|| {
            let k = it.next().unwrap();
            n += 1;
            black_box(t.insert((k.clone(), n)));
        })
    });
}

fn bench_lookup_hit(c: &mut Criterion) {
    c.bench_function("chain_table_lookup_hit", |b| {
        let mut t = new_table(1);
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            let _ = t.insert((k.clone(), i as u64));
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.lookup(k).unwrap());
        })
    });
}

fn bench_lookup_miss(c: &mut Criterion) {
    c.bench_function("chain_table_lookup_miss", |b| {
        let mut t = new_table(1);
        for (i, x) in lcg(11).take(10_000).enumerate() {
            let _ = t.insert((key(x), i as u64));
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in the table
            let k = key(miss.next().unwrap());
            black_box(t.lookup(&k));
        })
    });
}

// Past the ceiling chains keep lengthening; lookups degrade accordingly.
fn bench_lookup_at_ceiling(c: &mut Criterion) {
    c.bench_function("chain_table_lookup_hit_ceiling_64", |b| {
        let mut t: Table = ChainTable::with_max_capacity(1, 64, HashedPolicy::new(elem_key));
        let keys: Vec<_> = lcg(13).take(5_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            let _ = t.insert((k.clone(), i as u64));
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.lookup(k).unwrap());
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_growing, bench_insert_presized, bench_overwrite,
        bench_lookup_hit, bench_lookup_miss, bench_lookup_at_ceiling
}
criterion_main!(benches);
