use clockwork_pool::HashMap;
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
    c.bench_function("hash_map::insert_fresh_100k", |b| {
        b.iter_batched(
            HashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_warm_100k(c: &mut Criterion) {
    c.bench_function("hash_map::insert_warm_100k", |b| {
        b.iter_batched(
            || {
                // Pre-grow, then empty by removing so the free list is populated.
                let mut m = HashMap::new();
                let keys: Vec<String> = lcg(2).take(110_000).map(key).collect();
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k.clone(), i as u64);
                }
                for k in &keys {
                    let _ = m.remove(k);
                }
                m
            },
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    let _ = m.insert(key(x), i as u64);
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
                let m: HashMap<String, u64> = keys
                    .iter()
                    .enumerate()
                    .map(|(i, k)| (k.clone(), i as u64))
                    .collect();
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_remove: Vec<String> = (0..10_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % n].clone()
                    })
                    .collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    let _ = m.remove(k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_miss_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
    let m: HashMap<String, u64> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.clone(), i as u64))
        .collect();
    let hits: Vec<&String> = keys.iter().step_by(10).collect();
    let misses: Vec<String> = lcg(8).take(10_000).map(|x| key(x ^ 1)).collect();

    c.bench_function("hash_map::find_hit_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &hits {
                sum = sum.wrapping_add(*m.get(*k).unwrap_or(&0));
            }
            black_box(sum)
        })
    });
    c.bench_function("hash_map::find_miss_10k", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for k in &misses {
                found += m.contains_key(k) as usize;
            }
            black_box(found)
        })
    });
}

fn bench_iter_and_iter_mut(c: &mut Criterion) {
    let mut m: HashMap<u64, u64> = lcg(9).take(100_000).map(|x| (x, x)).collect();
    c.bench_function("hash_map::iter_sum_100k", |b| {
        b.iter(|| black_box(m.values().fold(0u64, |acc, v| acc.wrapping_add(*v))))
    });
    c.bench_function("hash_map::iter_mut_increment_100k", |b| {
        b.iter(|| {
            for (_, v) in m.iter_mut() {
                *v = v.wrapping_add(1);
            }
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
    targets = bench_insert_fresh_100k, bench_insert_warm_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_find_hit_miss_10k,
              bench_iter_and_iter_mut
}
criterion_main!(benches_insert, benches_ops);
