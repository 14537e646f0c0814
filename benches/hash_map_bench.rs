use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use digest_hashmap::{HashMap, NoopObserver};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s | 1) // keep clear of the empty digest
    })
}

type Map = HashMap<u64, u64, NoopObserver>;

fn filled(seed: u64, n: usize) -> (Map, Vec<u64>) {
    let mut m = Map::with_observer(NoopObserver);
    let keys: Vec<_> = lcg(seed).take(n).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k, i as u64).unwrap();
    }
    (m, keys)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("hash_map_insert_1k", |b| {
        b.iter_batched(
            || Map::with_observer(NoopObserver),
            |mut m| {
                for (i, k) in lcg(1).take(1_000).enumerate() {
                    m.insert(&k, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("hash_map_get_hit", |b| {
        let (m, keys) = filled(7, 1_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("hash_map_get_miss", |b| {
        let (m, _) = filled(11, 1_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = miss.next().unwrap();
            black_box(m.get(&k).is_err());
        })
    });
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("hash_map_remove_reinsert", |b| {
        let (mut m, keys) = filled(13, 1_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            m.remove(k);
            black_box(m.insert(k, 0).unwrap());
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
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_churn
}
criterion_main!(benches);
