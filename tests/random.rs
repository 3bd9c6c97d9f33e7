// Random test suite.
//
// Invariants exercised:
// - Determinism: equal seeds give equal sequences; different seeds diverge.
// - Bounds: bounded draws stay inside their half-open ranges.
// - Uniformity: bounded integers pass a chi-square test over small ranges.
use clockwork_pool::Random;
use proptest::prelude::*;
use tracing_test::traced_test;

#[test]
fn same_seed_same_sequence() {
    let mut a = Random::new(1234);
    let mut b = Random::new(1234);
    for _ in 0..1_000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Random::new(1235);
    let diverged = (0..16).any(|_| a.next_u64() != c.next_u64());
    assert!(diverged);
}

#[test]
fn entropy_generators_differ() {
    let mut a = Random::from_entropy();
    let mut b = Random::from_entropy();
    assert_ne!(a.next_u64(), b.next_u64());
}

#[test]
fn next_i32_never_reaches_max() {
    let mut r = Random::new(9);
    for _ in 0..100_000 {
        let x = r.next_i32();
        assert!((0..i32::MAX).contains(&x));
    }
}

#[test]
fn next_i32_range_accepts_reversed_bounds() {
    let mut r = Random::new(4);
    for _ in 0..1_000 {
        let x = r.next_i32_range(10, -10);
        assert!((-10..10).contains(&x));
    }
    assert_eq!(r.next_i32_range(5, 5), 5);
    for _ in 0..1_000 {
        let x = r.next_i32_range(i32::MIN, i32::MAX);
        assert!(x < i32::MAX);
    }
}

#[traced_test]
#[test]
fn non_positive_bound_warns_and_returns_zero() {
    let mut r = Random::new(8);
    assert_eq!(r.next_i32_below(0), 0);
    assert_eq!(r.next_i32_below(-5), 0);
    assert!(logs_contain("non-positive bound"));
}

#[test]
fn float_helpers_respect_ranges() {
    let mut r = Random::new(21);
    for _ in 0..10_000 {
        let s = r.next_f32_symmetric(2.0);
        assert!((-2.0..2.0).contains(&s));
        let f = r.next_f32_range(5.0, 6.0);
        assert!((5.0..6.0).contains(&f));
        let [x, y] = r.next_vec2_range([0.0, -1.0], [1.0, 0.0]);
        assert!((0.0..1.0).contains(&x) && (-1.0..0.0).contains(&y));
        let v = r.next_vec3_symmetric([1.0, 2.0, 3.0]);
        for (c, m) in v.iter().zip([1.0f32, 2.0, 3.0]) {
            assert!((-m..m).contains(c));
        }
    }
    assert!(!r.next_bool(0.0));
    assert!(r.next_bool(1.0));
}

/// Pearson chi-square statistic for `draws` samples over `buckets` outcomes.
fn chi_square(mut draw: impl FnMut() -> usize, buckets: usize, draws: usize) -> f64 {
    let mut counts = vec![0usize; buckets];
    for _ in 0..draws {
        counts[draw()] += 1;
    }
    let expected = draws as f64 / buckets as f64;
    counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum()
}

#[test]
fn bounded_ints_are_uniform() {
    let mut r = Random::new(77);
    // 99.9th percentile of chi-square with 9 degrees of freedom is ~27.9.
    let stat = chi_square(|| r.next_i32_below(10) as usize, 10, 100_000);
    assert!(stat < 27.9, "chi-square {stat} too large for 10 buckets");

    // A bound that is not a power of two exercises the rejection path;
    // 6 degrees of freedom, 99.9th percentile ~22.5.
    let stat = chi_square(|| r.next_u32_below(7) as usize, 7, 70_000);
    assert!(stat < 22.5, "chi-square {stat} too large for 7 buckets");
}

#[test]
fn unit_floats_are_uniform() {
    let mut r = Random::new(78);
    let stat = chi_square(|| (r.next_f32() * 16.0) as usize, 16, 160_000);
    // 15 degrees of freedom, 99.9th percentile ~37.7.
    assert!(stat < 37.7, "chi-square {stat} too large for 16 buckets");
}

proptest! {
    #[test]
    fn prop_next_u32_below_in_range(seed in any::<u64>(), max in 1u32..) {
        let mut r = Random::new(seed);
        for _ in 0..32 {
            prop_assert!(r.next_u32_below(max) < max);
        }
    }

    #[test]
    fn prop_next_i32_range_in_range(seed in any::<u64>(), a in any::<i32>(), b in any::<i32>()) {
        prop_assume!(a != b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let mut r = Random::new(seed);
        for _ in 0..32 {
            let x = r.next_i32_range(a, b);
            prop_assert!(lo <= x && x < hi);
        }
    }
}
