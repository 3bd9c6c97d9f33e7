//! clockwork-pool: allocation-conscious collections and a prototype-keyed
//! object pool for single-threaded, frame-driven runtimes.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small set of collections whose growth, reuse and failure modes
//!   are explicit, and an object pool built on top of them that can bound
//!   how many instances of an expensive effect are alive at once.
//! - Layers:
//!   - Vector<T>: growable array; doubling growth from 4, swap-remove,
//!     explicit capacity control, versioned cursors.
//!   - Deque<T>: power-of-two ring buffer; O(1) at both ends, `remove_at`
//!     shifts the shorter side.
//!   - HashMap<K, V, S>: chained buckets over a flat entry array with a
//!     free list of removed slots; prime bucket counts and fast modulo.
//!   - LinearMap<K, V>: small scanned key/value table for authored data.
//!   - Random: xoshiro256** with SplitMix64 seeding; unbiased bounded ints.
//!   - UniqueSampler<T>: draws from a fixed set with a no-repeat window.
//!   - PrefabRegistry<P>: per-prototype pools (free list + optional busy
//!     tracker) with generational worker ids.
//!
//! Constraints
//! - Single-threaded: no internal synchronization. The only process-wide
//!   state is the shared `Random` behind a mutex, which no collection
//!   locks; samplers own their generator.
//! - Caller contract violations fail fast: `Result` with `CollectionError`,
//!   or a panic for `Index` impls and for detected chain corruption.
//! - Expected degenerate cases (empty sampler, `try_*` on empty) return
//!   `None` rather than erroring.
//! - Pool misuse (unknown or double return, out-of-order return under a
//!   cap) is reported through `tracing` and never panics.
//!
//! Corruption detection
//! - A hash chain walk that visits more links than the table has entries
//!   yields `CollectionError::ConcurrentOperation`. This is a corruption
//!   detector, not a synchronization primitive.
//!
//! Pool ownership
//! - The registry owns all worker values. A worker id is in exactly one of:
//!   its pool's free list, or the rented set (the worker-to-pool map). A
//!   capped pool additionally tracks rented workers in rental order and, when
//!   the cap is exceeded, invokes the prototype's early-return callback on
//!   the oldest one. That worker stays rented until its owner returns it.

mod config;
mod deque;
mod error;
#[cfg(not(feature = "bench_internal"))]
mod hash_helpers;
#[cfg(feature = "bench_internal")]
pub mod hash_helpers;
mod hash_map;
mod hash_map_proptest;
mod linear_map;
mod pool;
mod random;
mod registry;
mod unique_sampler;
mod vector;

// Public surface
pub use config::{PoolConfig, SamplerConfig, SamplerMode};
pub use deque::Deque;
pub use error::{CollectionError, Result, ReturnError};
pub use hash_map::HashMap;
pub use linear_map::LinearMap;
pub use pool::PoolStats;
pub use random::Random;
pub use registry::{EarlyReturn, PrefabRegistry, Prototype, WorkerId};
pub use unique_sampler::UniqueSampler;
pub use vector::{Cursor, Vector};

pub mod iter {
    //! Iterator types returned by the collections.
    pub use crate::deque::Iter as DequeIter;
    pub use crate::hash_map::{Iter as HashMapIter, IterMut as HashMapIterMut};
}
