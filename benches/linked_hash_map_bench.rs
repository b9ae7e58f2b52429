use chain_hashmap::{LinkedHashMap, LruCache};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("linked::insert_fresh_100k", |b| {
        b.iter_batched(
            LinkedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_churn(c: &mut Criterion) {
    // 100k lookups over a 20k key space through a 10k entry cache.
    let space: Vec<String> = lcg(17).take(20_000).map(key).collect();
    let mut s = 0x9e3779b97f4a7c15u64;
    let trace: Vec<usize> = (0..100_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % space.len()
        })
        .collect();

    c.bench_function("linked::lru_10k_churn_100k", |b| {
        b.iter_batched(
            || LruCache::<String, u64>::lru(10_000),
            |mut cache| {
                let mut hits = 0u64;
                for &i in &trace {
                    let k = &space[i];
                    if cache.get(k.as_str()).is_some() {
                        hits += 1;
                    } else {
                        cache.insert(k.clone(), i as u64);
                    }
                }
                black_box((hits, cache))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    let m: LinkedHashMap<String, u64> =
        lcg(999).take(100_000).enumerate().map(|(i, x)| (key(x), i as u64)).collect();
    c.bench_function("linked::iter_all_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for v in m.values() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_pop_eldest_100k(c: &mut Criterion) {
    c.bench_function("linked::pop_eldest_100k", |b| {
        b.iter_batched(
            || -> LinkedHashMap<String, u64> {
                lcg(31).take(100_000).enumerate().map(|(i, x)| (key(x), i as u64)).collect()
            },
            |mut m| {
                while let Some(e) = m.pop_eldest() {
                    black_box(e);
                }
                m
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_lru_churn, bench_iter_100k, bench_pop_eldest_100k
}

criterion_main!(benches);
