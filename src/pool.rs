//! PrefabPool: free list and optional busy tracker for one prototype.

use crate::config::PoolConfig;
use crate::deque::Deque;
use crate::registry::{EarlyReturn, Prototype, WorkerId};
use crate::vector::Vector;
use hashbrown::HashSet;
use slotmap::SlotMap;

/// Live statistics for one prototype's pool.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
    /// Idle workers ready for reuse.
    pub free: usize,
    /// Workers counted against the concurrency cap (0 when uncapped).
    pub busy: usize,
    /// Workers currently held by callers, including early-returned ones.
    pub rented: usize,
    /// Workers ever instantiated by this pool.
    pub created: usize,
}

pub(crate) struct PrefabPool<P: Prototype> {
    prototype: P,
    free: Vector<WorkerId>,
    busy: Option<BusyWorkers<P::Worker>>,
    rented: usize,
    created: usize,
}

impl<P: Prototype> PrefabPool<P> {
    /// Reads the prototype's config and early-return capability once.
    pub(crate) fn new(prototype: P) -> Self {
        let PoolConfig {
            initial_capacity,
            max_concurrency,
        } = prototype.pool_config();

        let busy = match (max_concurrency, prototype.early_return()) {
            (Some(max), Some(early_return)) => Some(BusyWorkers::new(max, early_return)),
            (Some(max), None) => {
                tracing::warn!(
                    max_concurrency = max,
                    "prototype has a concurrency limit but no early-return capability; limit ignored"
                );
                None
            }
            _ => None,
        };
        tracing::debug!(max_concurrency = ?busy.as_ref().map(|b| b.max_concurrency), "pool created");

        Self {
            prototype,
            free: Vector::with_capacity(initial_capacity),
            busy,
            rented: 0,
            created: 0,
        }
    }

    pub(crate) fn prototype(&self) -> &P {
        &self.prototype
    }

    /// Hand out a free worker or instantiate one. Under a concurrency cap the
    /// oldest busy worker may be asked to return early before this returns.
    pub(crate) fn rent(&mut self, workers: &mut SlotMap<WorkerId, P::Worker>) -> WorkerId {
        let id = match self.free.try_pop() {
            Some(id) => id,
            None => {
                self.created += 1;
                workers.insert(self.prototype.instantiate())
            }
        };
        self.rented += 1;

        if let Some(busy) = &mut self.busy {
            if let Some(evicted) = busy.on_rented(id) {
                tracing::debug!(?evicted, "busy limit exceeded, scheduling early return");
                if let Some(worker) = workers.get_mut(evicted) {
                    (busy.early_return)(worker);
                }
            }
        }
        id
    }

    pub(crate) fn return_worker(&mut self, id: WorkerId) {
        if let Some(busy) = &mut self.busy {
            busy.on_returned(id);
        }
        debug_assert!(self.rented > 0);
        self.rented = self.rented.saturating_sub(1);
        self.free.push(id);
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            free: self.free.len(),
            busy: self.busy.as_ref().map_or(0, |b| b.deque.len()),
            rented: self.rented,
            created: self.created,
        }
    }
}

/// Rental-ordered busy set. Every tracked worker is in both the deque and
/// the set exactly once.
struct BusyWorkers<W> {
    deque: Deque<WorkerId>,
    set: HashSet<WorkerId>,
    max_concurrency: usize,
    early_return: EarlyReturn<W>,
}

impl<W> BusyWorkers<W> {
    fn new(max_concurrency: usize, early_return: EarlyReturn<W>) -> Self {
        Self {
            deque: Deque::new(),
            set: HashSet::new(),
            max_concurrency,
            early_return,
        }
    }

    /// Track `id`; returns the oldest worker if the cap is now exceeded.
    fn on_rented(&mut self, id: WorkerId) -> Option<WorkerId> {
        self.deque.push_back(id);
        let added = self.set.insert(id);
        debug_assert!(added, "worker already tracked as busy");

        if self.deque.len() > self.max_concurrency {
            let front = self.deque.try_pop_front()?;
            let removed = self.set.remove(&front);
            debug_assert!(removed);
            return Some(front);
        }
        None
    }

    fn on_returned(&mut self, id: WorkerId) {
        if !self.set.remove(&id) {
            // Already evicted by the cap.
            return;
        }
        if self.deque.try_peek_front() == Some(&id) {
            let _ = self.deque.try_pop_front();
        } else {
            let removed = self.deque.remove(&id);
            debug_assert!(removed);
            tracing::warn!(?id, "non-deterministic return behavior found");
        }
    }
}
