//! Per-prototype pool settings and sampler settings.
//!
//! With the `serde` feature both structs deserialize from any serde format,
//! missing fields falling back to their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DEFAULT_POOL_CAPACITY: usize = 4;

/// Settings read once, when a prototype's pool is first created.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct PoolConfig {
    /// Initial capacity of the free list.
    pub initial_capacity: usize,
    /// Upper bound on simultaneously busy workers. Only honoured when the
    /// prototype also exposes an early-return capability.
    pub max_concurrency: Option<usize>,
}

impl PoolConfig {
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: Some(max_concurrency),
            ..Self::default()
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_POOL_CAPACITY,
            max_concurrency: None,
        }
    }
}

/// How a [`UniqueSampler`](crate::UniqueSampler) keeps its no-repeat window.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SamplerMode {
    /// Shuffle an auxiliary index permutation; the item order stays untouched.
    #[default]
    Ordered,
    /// Shuffle the items in place.
    Unordered,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct SamplerConfig {
    /// Size of the no-repeat window; clamped to `item count - 1`.
    pub unique_samples: usize,
    pub mode: SamplerMode,
}
