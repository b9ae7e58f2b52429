use chain_hashmap::HashMap;
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

// Pseudo-random indices into 0..n, with repeats.
fn picks(n: usize, count: usize) -> Vec<usize> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            (s as usize) % n
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("hash_map::insert_fresh_100k", |b| {
        b.iter_batched(
            HashMap::<String, u64>::new,
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

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("hash_map::insert_presized_100k", |b| {
        b.iter_batched(
            || HashMap::<String, u64>::with_capacity(1 << 18),
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("hash_map::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let keys: Vec<String> = lcg(5).take(110_000).map(key).collect();
                let m: HashMap<String, u64> =
                    keys.iter().cloned().enumerate().map(|(i, k)| (k, i as u64)).collect();
                let to_remove: Vec<String> =
                    picks(keys.len(), 10_000).into_iter().map(|i| keys[i].clone()).collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("hash_map::get_hit_10k_on_100k", |b| {
        let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
        let m: HashMap<String, u64> =
            keys.iter().cloned().enumerate().map(|(i, k)| (k, i as u64)).collect();
        let queries: Vec<&String> = picks(keys.len(), 10_000).into_iter().map(|i| &keys[i]).collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k.as_str()));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("hash_map::get_miss_10k_on_100k", |b| {
        let m: HashMap<String, u64> =
            lcg(11).take(100_000).enumerate().map(|(i, x)| (key(x), i as u64)).collect();
        let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(m.get(k.as_str()));
            }
        })
    });
}

fn bench_iter_and_cursor(c: &mut Criterion) {
    let m: HashMap<String, u64> =
        lcg(999).take(100_000).enumerate().map(|(i, x)| (key(x), i as u64)).collect();

    c.bench_function("hash_map::iter_all_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("hash_map::cursor_all_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let mut cursor = m.cursor();
            while let Ok(Some(v)) = cursor.next_value(&m) {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k
}

criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k, bench_get_hit_10k, bench_get_miss_10k, bench_iter_and_cursor
}

criterion_main!(benches_insert, benches_ops);
