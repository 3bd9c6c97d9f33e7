//! xoshiro256** generator with SplitMix64 seeding and Lemire bounded integers.

use core::sync::atomic::{AtomicU64, Ordering};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Process-wide seed sequence for [`Random::from_entropy`], started from the clock.
static SEED: Lazy<AtomicU64> = Lazy::new(|| {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(GOLDEN_GAMMA);
    AtomicU64::new(nanos)
});

static SHARED: Lazy<Mutex<Random>> = Lazy::new(|| {
    let seed = next_entropy_seed();
    tracing::info!(seed, "shared random generator created");
    Mutex::new(Random::new(seed))
});

fn next_entropy_seed() -> u64 {
    let prev = SEED.fetch_add(GOLDEN_GAMMA, Ordering::Relaxed);
    mix(prev.wrapping_add(GOLDEN_GAMMA))
}

/// SplitMix64 finalizer.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Advance a SplitMix64 state and return the next output.
#[inline]
fn split_mix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    mix(*state)
}

/// Deterministic 64-bit generator. The four state words are never all zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Random {
    s0: u64,
    s1: u64,
    s2: u64,
    s3: u64,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        let mut seed = seed;
        let s0 = split_mix(&mut seed);
        let s1 = split_mix(&mut seed);
        let s2 = split_mix(&mut seed);
        let s3 = split_mix(&mut seed);
        assert!(
            (s0 | s1 | s2 | s3) != 0,
            "xoshiro state must not be all zero"
        );
        Self { s0, s1, s2, s3 }
    }

    /// Seeded from the process-wide clock-derived sequence; every call differs.
    pub fn from_entropy() -> Self {
        Self::new(next_entropy_seed())
    }

    /// Run `f` with the lazily created process-wide generator.
    pub fn with_shared<R>(f: impl FnOnce(&mut Random) -> R) -> R {
        let mut rng = SHARED.lock();
        f(&mut rng)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let result = self.s1.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.s1 << 17;

        self.s2 ^= self.s0;
        self.s3 ^= self.s1;
        self.s1 ^= self.s2;
        self.s0 ^= self.s3;
        self.s2 ^= t;
        self.s3 = self.s3.rotate_left(45);

        result
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform in `[0, max)` via Lemire's multiply-and-reject; `max == 0` yields 0.
    #[inline]
    pub fn next_u32_below(&mut self, max: u32) -> u32 {
        let mut product = u64::from(max) * u64::from(self.next_u32());
        let mut low = product as u32;

        if low < max {
            let threshold = max.wrapping_neg() % max;
            while low < threshold {
                product = u64::from(max) * u64::from(self.next_u32());
                low = product as u32;
            }
        }

        (product >> 32) as u32
    }

    /// Uniform in `[0, i32::MAX)`.
    pub fn next_i32(&mut self) -> i32 {
        loop {
            let result = self.next_u64() >> 33;
            if result != i32::MAX as u64 {
                return result as i32;
            }
        }
    }

    /// Uniform in `[0, max)`. A non-positive bound logs a warning and yields 0.
    pub fn next_i32_below(&mut self, max: i32) -> i32 {
        if max <= 0 {
            tracing::warn!(max, "next_i32_below called with non-positive bound, returning 0");
            return 0;
        }
        self.next_u32_below(max as u32) as i32
    }

    /// Uniform in `[min, max)`; reversed bounds are swapped.
    pub fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        let span = (i64::from(max) - i64::from(min)) as u32;
        (i64::from(min) + i64::from(self.next_u32_below(span))) as i32
    }

    /// Uniform `usize` in `[min, max)`; used for window sampling.
    pub(crate) fn next_index(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max && max - min <= u32::MAX as usize);
        min + self.next_u32_below((max - min) as u32) as usize
    }

    /// Uniform in `[0, 1)` with 24 bits of precision.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform in `[-max, max)`.
    pub fn next_f32_symmetric(&mut self, max: f32) -> f32 {
        self.next_f32() * 2.0 * max - max
    }

    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        self.next_f32() * (max - min) + min
    }

    pub fn next_bool(&mut self, true_probability: f32) -> bool {
        self.next_f32() < true_probability
    }

    pub fn next_vec2(&mut self) -> [f32; 2] {
        [self.next_f32(), self.next_f32()]
    }

    pub fn next_vec2_symmetric(&mut self, max: [f32; 2]) -> [f32; 2] {
        let v = self.next_vec2();
        [v[0] * 2.0 * max[0] - max[0], v[1] * 2.0 * max[1] - max[1]]
    }

    pub fn next_vec2_range(&mut self, min: [f32; 2], max: [f32; 2]) -> [f32; 2] {
        let v = self.next_vec2();
        [
            v[0] * (max[0] - min[0]) + min[0],
            v[1] * (max[1] - min[1]) + min[1],
        ]
    }

    pub fn next_vec3(&mut self) -> [f32; 3] {
        [self.next_f32(), self.next_f32(), self.next_f32()]
    }

    pub fn next_vec3_symmetric(&mut self, max: [f32; 3]) -> [f32; 3] {
        let v = self.next_vec3();
        core::array::from_fn(|i| v[i] * 2.0 * max[i] - max[i])
    }

    pub fn next_vec3_range(&mut self, min: [f32; 3], max: [f32; 3]) -> [f32; 3] {
        let v = self.next_vec3();
        core::array::from_fn(|i| v[i] * (max[i] - min[i]) + min[i])
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::from_entropy()
    }
}
