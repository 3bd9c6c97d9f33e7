//! PrefabRegistry: prototype-keyed object pooling with generational worker ids.
//!
//! The registry owns every worker it has ever instantiated in a slot map;
//! callers hold [`WorkerId`]s. At any moment a worker is owned by exactly one
//! of: its pool's free list, or a caller (possibly also counted by the pool's
//! busy tracker). The worker-to-pool map is the single source of truth for
//! "currently rented", which is what makes double returns detectable.
//!
//! Construct one registry per session and [`clear`](PrefabRegistry::clear) it
//! at the session boundary; nothing here is global.

use crate::config::PoolConfig;
use crate::error::ReturnError;
use crate::hash_map::HashMap;
use crate::pool::{PoolStats, PrefabPool};
use crate::vector::Vector;
use core::hash::Hash;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to a pooled worker.
    pub struct WorkerId;
}

/// Callback the pool invokes on the oldest busy worker when a concurrency
/// cap is exceeded. It should start winding the worker down; the worker is
/// still rented and must be returned by its owner once done.
pub type EarlyReturn<W> = fn(&mut W);

/// The template a class of workers is instantiated from.
///
/// `pool_config` and `early_return` are read once, when the prototype is
/// first rented.
pub trait Prototype {
    type Worker;

    fn instantiate(&self) -> Self::Worker;

    fn pool_config(&self) -> PoolConfig {
        PoolConfig::default()
    }

    /// Capability required for `PoolConfig::max_concurrency` to take effect.
    fn early_return(&self) -> Option<EarlyReturn<Self::Worker>> {
        None
    }
}

pub struct PrefabRegistry<P: Prototype> {
    workers: SlotMap<WorkerId, P::Worker>,
    pools: Vector<PrefabPool<P>>,
    prefab_to_pool: HashMap<P, usize>,
    worker_to_pool: HashMap<WorkerId, usize>,
}

impl<P> PrefabRegistry<P>
where
    P: Prototype + Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            workers: SlotMap::with_key(),
            pools: Vector::new(),
            prefab_to_pool: HashMap::new(),
            worker_to_pool: HashMap::new(),
        }
    }

    /// Rent a worker for `prototype`, creating its pool on first use.
    pub fn rent(&mut self, prototype: &P) -> WorkerId {
        let index = match self.prefab_to_pool.get(prototype) {
            Some(&index) => index,
            None => {
                let index = self.pools.len();
                self.pools.push(PrefabPool::new(prototype.clone()));
                self.prefab_to_pool.insert(prototype.clone(), index);
                index
            }
        };

        let id = self.pools[index].rent(&mut self.workers);
        let previous = self.worker_to_pool.insert(id, index);
        debug_assert!(previous.is_none(), "free worker was still marked as rented");
        id
    }

    /// Give a worker back to its pool. Unknown or already returned workers are
    /// reported and otherwise ignored.
    pub fn return_worker(&mut self, id: WorkerId) -> Result<(), ReturnError> {
        match self.worker_to_pool.remove(&id) {
            Some(index) => {
                self.pools[index].return_worker(id);
                Ok(())
            }
            None => {
                tracing::warn!(?id, "unknown worker returned to registry");
                Err(ReturnError::UnknownWorker)
            }
        }
    }

    /// Prototype a currently rented worker was created from.
    pub fn prefab_of(&self, id: WorkerId) -> Option<&P> {
        let &index = self.worker_to_pool.get(&id)?;
        self.pools.get(index).map(|pool| pool.prototype())
    }

    pub fn is_rented(&self, id: WorkerId) -> bool {
        self.worker_to_pool.contains_key(&id)
    }

    /// Access a worker. Free workers stay reachable so that ids held past
    /// their return still resolve; callers must not rely on that.
    pub fn worker(&self, id: WorkerId) -> Option<&P::Worker> {
        self.workers.get(id)
    }

    pub fn worker_mut(&mut self, id: WorkerId) -> Option<&mut P::Worker> {
        self.workers.get_mut(id)
    }

    pub fn stats(&self, prototype: &P) -> Option<PoolStats> {
        let &index = self.prefab_to_pool.get(prototype)?;
        self.pools.get(index).map(|pool| pool.stats())
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Workers instantiated and not yet dropped, free or rented.
    pub fn live_workers(&self) -> usize {
        self.workers.len()
    }

    /// Drop every pool and worker. Outstanding ids become invalid.
    pub fn clear(&mut self) {
        tracing::debug!(
            pools = self.pools.len(),
            workers = self.workers.len(),
            "clearing prefab registry"
        );
        self.worker_to_pool.clear();
        self.prefab_to_pool.clear();
        self.pools.clear();
        self.workers.clear();
    }
}

impl<P> Default for PrefabRegistry<P>
where
    P: Prototype + Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
