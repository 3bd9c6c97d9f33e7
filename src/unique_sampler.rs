//! UniqueSampler: random draws from a fixed item set with a no-repeat window.
//!
//! The most recent `unique_samples` draws occupy the protected prefix
//! `[0, buffer_length)` of a permutation (either the items themselves or an
//! index array). Each draw picks uniformly from the unprotected suffix and
//! swaps the winner into `buffer_offset`, which cycles through the prefix so
//! that the oldest protected item is the one released.

use crate::config::{SamplerConfig, SamplerMode};
use crate::random::Random;
use core::ops::Index;

#[derive(Clone, Debug)]
pub struct UniqueSampler<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    unique_samples: usize,
    buffer_length: usize,
    buffer_offset: usize,
    mode: SamplerMode,
    random: Random,
}

impl<T> UniqueSampler<T> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_vec(items.into_iter().collect())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            indices: Vec::new(),
            unique_samples: 0,
            buffer_length: 0,
            buffer_offset: 0,
            mode: SamplerMode::default(),
            random: Random::from_entropy(),
        }
    }

    pub fn from_config<I>(items: I, config: SamplerConfig) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::new(items)
            .with_mode(config.mode)
            .with_unique_samples(config.unique_samples)
    }

    pub fn with_mode(mut self, mode: SamplerMode) -> Self {
        self.mode = mode;
        self.reset();
        self
    }

    /// Replace the entropy-seeded generator, e.g. with a fixed seed.
    pub fn with_random(mut self, random: Random) -> Self {
        self.random = random;
        self
    }

    pub fn with_unique_samples(mut self, unique_samples: usize) -> Self {
        self.set_unique_samples(unique_samples);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mode(&self) -> SamplerMode {
        self.mode
    }

    pub fn unique_samples(&self) -> usize {
        self.unique_samples
    }

    /// Clamp to `[0, len - 1]` and clear the window.
    pub fn set_unique_samples(&mut self, unique_samples: usize) {
        self.unique_samples = unique_samples.min(self.items.len().saturating_sub(1));
        self.reset();
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Backing items. In [`SamplerMode::Unordered`] their order changes as draws happen.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Forget the window; every item becomes eligible again. Items are not reshuffled.
    pub fn reset(&mut self) {
        self.buffer_length = 0;
        self.buffer_offset = 0;
    }

    /// Next item, `None` when there are no items.
    pub fn sample(&mut self) -> Option<&T> {
        match self.items.len() {
            0 => None,
            1 => self.items.first(),
            _ => Some(match self.mode {
                SamplerMode::Ordered => self.sample_ordered(),
                SamplerMode::Unordered => self.sample_unordered(),
            }),
        }
    }

    fn sample_ordered(&mut self) -> &T {
        let len = self.items.len();
        if self.indices.len() != len {
            self.reset();
            self.indices = (0..len).collect();
        }

        let index = self.draw(self.buffer_length, len);
        let result = self.indices[index];
        self.indices.swap(index, self.buffer_offset);
        self.advance_window();

        &self.items[result]
    }

    fn sample_unordered(&mut self) -> &T {
        let len = self.items.len();
        let index = self.draw(self.buffer_length, len);
        let slot = self.buffer_offset;
        self.items.swap(index, slot);
        self.advance_window();

        &self.items[slot]
    }

    fn draw(&mut self, min: usize, max: usize) -> usize {
        self.random.next_index(min, max)
    }

    fn advance_window(&mut self) {
        self.buffer_length = self.unique_samples.min(self.buffer_length + 1);
        self.buffer_offset = if self.buffer_offset + 1 >= self.unique_samples {
            0
        } else {
            self.buffer_offset + 1
        };
    }
}

impl<T> FromIterator<T> for UniqueSampler<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T> Index<usize> for UniqueSampler<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.items.get(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                crate::CollectionError::IndexOutOfRange {
                    index,
                    len: self.items.len()
                }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded<T>(items: Vec<T>, k: usize, mode: SamplerMode) -> UniqueSampler<T> {
        UniqueSampler::from_vec(items)
            .with_mode(mode)
            .with_random(Random::new(42))
            .with_unique_samples(k)
    }

    #[test]
    fn empty_sampler_returns_none() {
        let mut s: UniqueSampler<u8> = UniqueSampler::new(Vec::new());
        for _ in 0..10 {
            assert_eq!(s.sample(), None);
        }
        s.set_unique_samples(5);
        assert_eq!(s.unique_samples(), 0);
    }

    #[test]
    fn single_item_always_returned() {
        let mut s = seeded(vec!["only"], 3, SamplerMode::Unordered);
        assert_eq!(s.unique_samples(), 0);
        for _ in 0..100 {
            assert_eq!(s.sample(), Some(&"only"));
        }
    }

    #[test]
    fn unique_samples_is_clamped() {
        let mut s = seeded((0..5).collect(), 100, SamplerMode::Ordered);
        assert_eq!(s.unique_samples(), 4);
        s.set_unique_samples(2);
        assert_eq!(s.unique_samples(), 2);
    }

    #[test]
    fn full_window_cycles_through_every_item() {
        // With k = n - 1, each block of n draws is a permutation.
        for mode in [SamplerMode::Ordered, SamplerMode::Unordered] {
            let mut s = seeded((0..6).collect::<Vec<u32>>(), 5, mode);
            let draws: Vec<u32> = (0..60).map(|_| *s.sample().unwrap()).collect();
            for w in draws.windows(6) {
                let mut sorted = w.to_vec();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5], "{mode:?}: {w:?}");
            }
        }
    }

    #[test]
    fn ordered_mode_leaves_items_untouched() {
        let mut s = seeded((0..8).collect::<Vec<u32>>(), 3, SamplerMode::Ordered);
        for _ in 0..100 {
            s.sample();
        }
        assert_eq!(s.items(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(s[3], 3);
        assert_eq!(s.get(8), None);
    }

    #[test]
    fn unordered_mode_keeps_the_same_item_set() {
        let mut s = seeded((0..8).collect::<Vec<u32>>(), 3, SamplerMode::Unordered);
        for _ in 0..100 {
            s.sample();
        }
        let mut items = s.items().to_vec();
        items.sort_unstable();
        assert_eq!(items, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn reset_makes_recent_items_eligible() {
        // n = 2, k = 1: draws must alternate until reset.
        let mut s = seeded(vec!['a', 'b'], 1, SamplerMode::Ordered);
        let first = *s.sample().unwrap();
        let second = *s.sample().unwrap();
        assert_ne!(first, second);

        let mut repeated = false;
        for _ in 0..64 {
            let before = *s.sample().unwrap();
            s.reset();
            if *s.sample().unwrap() == before {
                repeated = true;
                break;
            }
            s.reset();
        }
        assert!(repeated, "after reset the last item must be drawable again");
    }

    #[test]
    fn sampling_never_touches_the_shared_generator() {
        let mut s = UniqueSampler::new(0..4u32).with_unique_samples(2);
        let drawn = Random::with_shared(|r| {
            r.next_u64();
            *s.sample().unwrap()
        });
        assert!(drawn < 4);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded((0..10).collect::<Vec<u32>>(), 4, SamplerMode::Ordered);
        let mut b = seeded((0..10).collect::<Vec<u32>>(), 4, SamplerMode::Ordered);
        for _ in 0..200 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
