use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use interval_trees::segment_tree::{
    policies::{AddSum, Sum},
    IntervalTree, LazyIntervalTree,
};
use rand::Rng;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

// magnitude of generated values, small enough that sums over 10^6 elements stay in i64
const VALUE_MAX: i64 = 1000;

const RNG_SEED: [u8; 16] = *b"0123456789abcdef";

/// generate n random values in (-VALUE_MAX, VALUE_MAX)
fn get_random_values(rng: &mut XorShiftRng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(-VALUE_MAX + 1..VALUE_MAX)).collect()
}

/// generate a random inclusive range into a sequence of length n
fn get_random_range(rng: &mut XorShiftRng, n: usize) -> std::ops::RangeInclusive<usize> {
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    a.min(b)..=a.max(b)
}

fn eager_update_query_n(n: usize, calls: usize) -> i64 {
    let mut rng = XorShiftRng::from_seed(RNG_SEED);
    let mut tree = IntervalTree::new(get_random_values(&mut rng, n), Sum::new())
        .unwrap_or_else(|_| panic!("We only build non empty trees in the benchmark."));

    let mut acc = 0;
    for _ in 0..calls {
        let index = rng.gen_range(0..n);
        tree.update(index, rng.gen_range(-VALUE_MAX + 1..VALUE_MAX))
            .unwrap_or_else(|_| panic!("We only perform valid updates in the benchmark."));
        acc += tree
            .query(get_random_range(&mut rng, n))
            .unwrap_or_else(|_| panic!("We only perform valid queries in the benchmark."));
    }
    acc
}

fn lazy_update_query_n(n: usize, calls: usize) -> i64 {
    let mut rng = XorShiftRng::from_seed(RNG_SEED);
    let mut tree = LazyIntervalTree::new(get_random_values(&mut rng, n), AddSum::new())
        .unwrap_or_else(|_| panic!("We only build non empty trees in the benchmark."));

    let mut acc = 0;
    for _ in 0..calls {
        tree.update(get_random_range(&mut rng, n), rng.gen_range(-10..10))
            .unwrap_or_else(|_| panic!("We only perform valid updates in the benchmark."));
        acc += tree
            .query(get_random_range(&mut rng, n))
            .unwrap_or_else(|_| panic!("We only perform valid queries in the benchmark."));
    }
    acc
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_tree_update_query");
    for n in [1000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("eager", n), n, |b, &n| {
            b.iter(|| eager_update_query_n(black_box(n), 1000))
        });
        group.bench_with_input(BenchmarkId::new("lazy", n), n, |b, &n| {
            b.iter(|| lazy_update_query_n(black_box(n), 1000))
        });
    }
    group.sample_size(10);
    group.bench_function("build_1000000", |b| {
        let mut rng = XorShiftRng::from_seed(RNG_SEED);
        let values = get_random_values(&mut rng, 1_000_000);
        b.iter(|| {
            LazyIntervalTree::new(black_box(values.clone()), AddSum::new())
                .map(|tree| tree.len())
                .unwrap_or_else(|_| panic!("We only build non empty trees in the benchmark."))
        })
    });
    group.finish()
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
