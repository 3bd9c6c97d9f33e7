//! HashMap: separate chaining threaded through a flat entry array.
//!
//! Buckets hold `entry index + 1` (zero means empty). Each entry carries its
//! cached 32-bit hash and the index of the next entry in its chain. Removed
//! entries are not tombstoned in place; they are threaded onto a free list
//! through the same `next` field, encoded as `START_OF_FREE_LIST - next_free`
//! so that a free entry's `next` is always `<= -2` while live entries keep
//! `next >= -1`. Inserts reuse free entries before growing.
//!
//! Bucket arrays are sized to primes from [`hash_helpers`](crate::hash_helpers).
//! A chain walk that visits more links than there are entries means the
//! structure was corrupted; this is reported as
//! [`CollectionError::ConcurrentOperation`] and fails fast.

use crate::error::{CollectionError, Result};
use crate::hash_helpers;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;

const START_OF_FREE_LIST: i32 = -3;

#[derive(Clone)]
struct Entry<K, V> {
    hash: u32,
    next: i32,
    kv: Option<(K, V)>,
}

#[derive(Clone)]
pub struct HashMap<K, V, S = RandomState> {
    buckets: Vec<i32>,
    entries: Vec<Entry<K, V>>,
    fast_mod_multiplier: u64,
    free_list: i32,
    free_count: usize,
    hasher: S,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum InsertionBehavior {
    None,
    OverwriteExisting,
    ThrowOnExisting,
}

enum Inserted<V> {
    New,
    Replaced(V),
    Existing,
}

impl<K, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            buckets: Vec::new(),
            entries: Vec::new(),
            fast_mod_multiplier: 0,
            free_list: -1,
            free_count: 0,
            hasher,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let mut map = Self::with_hasher(hasher);
        if capacity > 0 {
            map.initialize(capacity);
        }
        map
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries the table holds before it must grow (a prime, or 0).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.buckets.iter_mut().for_each(|b| *b = 0);
            self.entries.clear();
            self.free_list = -1;
            self.free_count = 0;
        }
    }

    /// Entries in storage order; no particular key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.entries.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Walk every bucket chain and the free list, checking that each
    /// terminates within the entry count and that the tallies add up.
    pub fn validate(&self) -> Result<()> {
        let limit = self.entries.len();
        let mut reachable = 0usize;
        for &bucket in &self.buckets {
            let mut i = bucket - 1;
            let mut collisions = 0usize;
            while i >= 0 {
                let entry = self
                    .entries
                    .get(i as usize)
                    .ok_or(CollectionError::ConcurrentOperation)?;
                if entry.kv.is_none() {
                    return Err(CollectionError::ConcurrentOperation);
                }
                reachable += 1;
                i = entry.next;
                collisions += 1;
                if collisions > limit {
                    return Err(CollectionError::ConcurrentOperation);
                }
            }
        }

        let mut free = 0usize;
        let mut i = self.free_list;
        while i >= 0 {
            let entry = self
                .entries
                .get(i as usize)
                .ok_or(CollectionError::ConcurrentOperation)?;
            free += 1;
            if free > limit || entry.next > -2 {
                return Err(CollectionError::ConcurrentOperation);
            }
            i = START_OF_FREE_LIST - entry.next;
        }

        if reachable != self.len() || free != self.free_count {
            return Err(CollectionError::ConcurrentOperation);
        }
        Ok(())
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        let len = self.buckets.len();
        #[cfg(target_pointer_width = "64")]
        {
            hash_helpers::fast_mod(hash, len as u32, self.fast_mod_multiplier) as usize
        }
        #[cfg(not(target_pointer_width = "64"))]
        {
            hash as usize % len
        }
    }

    fn initialize(&mut self, capacity: usize) -> usize {
        let size = hash_helpers::get_prime(capacity);
        self.buckets = vec![0; size];
        self.entries = Vec::with_capacity(size);
        self.fast_mod_multiplier = hash_helpers::fast_mod_multiplier(size as u32);
        self.free_list = -1;
        self.free_count = 0;
        size
    }

    /// Re-prime and rebuild every live chain in entry-index order.
    fn resize(&mut self) {
        let new_size = hash_helpers::expand_prime(self.entries.len());
        debug_assert!(new_size >= self.buckets.len());

        self.buckets = vec![0; new_size];
        self.fast_mod_multiplier = hash_helpers::fast_mod_multiplier(new_size as u32);
        self.entries
            .reserve_exact(new_size.saturating_sub(self.entries.len()));

        for i in 0..self.entries.len() {
            if self.entries[i].next >= -1 {
                let b = self.bucket_of(self.entries[i].hash);
                self.entries[i].next = self.buckets[b] - 1;
                self.buckets[b] = i as i32 + 1;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_first_chain_into_cycle(&mut self) {
        if let Some(&b) = self.buckets.iter().find(|&&b| b > 0) {
            let i = (b - 1) as usize;
            self.entries[i].next = i as i32;
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_of<Q>(&self, q: &Q) -> u32
    where
        Q: ?Sized + Hash,
    {
        // Only the low 32 bits take part in bucket selection.
        self.hasher.hash_one(q) as u32
    }

    fn find_index<Q>(&self, q: &Q) -> Result<Option<usize>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return Ok(None);
        }
        let hash = self.hash_of(q);
        let mut i = self.buckets[self.bucket_of(hash)] - 1;
        let mut collisions = 0usize;

        while i >= 0 {
            let entry = &self.entries[i as usize];
            if entry.hash == hash {
                if let Some((k, _)) = &entry.kv {
                    if k.borrow() == q {
                        return Ok(Some(i as usize));
                    }
                }
            }
            i = entry.next;
            collisions += 1;
            if collisions > self.entries.len() {
                return Err(CollectionError::ConcurrentOperation);
            }
        }
        Ok(None)
    }

    #[inline]
    fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find_index(q) {
            Ok(found) => found,
            Err(e) => panic!("{e}"),
        }
    }

    fn try_insert(
        &mut self,
        key: K,
        value: V,
        behavior: InsertionBehavior,
    ) -> Result<(usize, Inserted<V>)> {
        if self.buckets.is_empty() {
            self.initialize(0);
        }

        let hash = self.hash_of(&key);
        let mut b = self.bucket_of(hash);
        let mut i = self.buckets[b] - 1;
        let mut collisions = 0usize;

        while i >= 0 {
            let idx = i as usize;
            let entry = &mut self.entries[idx];
            if entry.hash == hash {
                if let Some((k, v)) = &mut entry.kv {
                    if *k == key {
                        return match behavior {
                            InsertionBehavior::OverwriteExisting => {
                                let old = core::mem::replace(v, value);
                                Ok((idx, Inserted::Replaced(old)))
                            }
                            InsertionBehavior::ThrowOnExisting => {
                                Err(CollectionError::DuplicateKey)
                            }
                            InsertionBehavior::None => Ok((idx, Inserted::Existing)),
                        };
                    }
                }
            }
            i = entry.next;
            collisions += 1;
            if collisions > self.entries.len() {
                return Err(CollectionError::ConcurrentOperation);
            }
        }

        let index = if self.free_count > 0 {
            let index = self.free_list as usize;
            let encoded = self.entries[index].next;
            debug_assert!(START_OF_FREE_LIST - encoded >= -1);
            self.free_list = START_OF_FREE_LIST - encoded;
            self.free_count -= 1;
            self.entries[index] = Entry {
                hash,
                next: self.buckets[b] - 1,
                kv: Some((key, value)),
            };
            index
        } else {
            if self.entries.len() == self.buckets.len() {
                self.resize();
                b = self.bucket_of(hash);
            }
            let index = self.entries.len();
            self.entries.push(Entry {
                hash,
                next: self.buckets[b] - 1,
                kv: Some((key, value)),
            });
            index
        };
        self.buckets[b] = index as i32 + 1;

        Ok((index, Inserted::New))
    }

    /// Insert or overwrite (the indexer setter). Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value, InsertionBehavior::OverwriteExisting) {
            Ok((_, Inserted::Replaced(old))) => Some(old),
            Ok(_) => None,
            Err(e) => panic!("{e}"),
        }
    }

    /// Insert a new key; fails with [`CollectionError::DuplicateKey`] if present.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        self.try_insert(key, value, InsertionBehavior::ThrowOnExisting)
            .map(|_| ())
    }

    /// Insert a new key; returns `false` and leaves the map untouched if present.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        match self.try_insert(key, value, InsertionBehavior::None) {
            Ok((_, Inserted::New)) => true,
            Ok(_) => false,
            Err(e) => panic!("{e}"),
        }
    }

    /// Value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = match self.find(&key) {
            Some(i) => i,
            None => match self.try_insert(key, default(), InsertionBehavior::None) {
                Ok((i, _)) => i,
                Err(e) => panic!("{e}"),
            },
        };
        match &mut self.entries[index].kv {
            Some((_, v)) => v,
            None => panic!("{}", CollectionError::ConcurrentOperation),
        }
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.entries[i].kv.as_ref().map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.entries[i].kv.as_mut().map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(q)?;
        self.entries[i].kv.as_ref().map(|(k, v)| (k, v))
    }

    /// The indexer getter: fails with [`CollectionError::KeyNotFound`] if absent.
    pub fn value<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find_index(q)? {
            Some(i) => self.entries[i]
                .kv
                .as_ref()
                .map(|(_, v)| v)
                .ok_or(CollectionError::ConcurrentOperation),
            None => Err(CollectionError::KeyNotFound),
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlink the entry for `q` and push its slot onto the free list.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = self.hash_of(q);
        let b = self.bucket_of(hash);
        let mut last: i32 = -1;
        let mut i = self.buckets[b] - 1;
        let mut collisions = 0usize;

        while i >= 0 {
            let idx = i as usize;
            let matches = {
                let entry = &self.entries[idx];
                entry.hash == hash
                    && entry
                        .kv
                        .as_ref()
                        .map(|(k, _)| k.borrow() == q)
                        .unwrap_or(false)
            };
            if matches {
                let next = self.entries[idx].next;
                if last < 0 {
                    self.buckets[b] = next + 1;
                } else {
                    self.entries[last as usize].next = next;
                }

                debug_assert!(START_OF_FREE_LIST - self.free_list < 0);
                let entry = &mut self.entries[idx];
                entry.next = START_OF_FREE_LIST - self.free_list;
                let kv = entry.kv.take();

                self.free_list = i;
                self.free_count += 1;
                return kv;
            }

            last = i;
            i = self.entries[idx].next;
            collisions += 1;
            if collisions > self.entries.len() {
                panic!("{}", CollectionError::ConcurrentOperation);
            }
        }
        None
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.value(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

/// Iterator over live entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .find_map(|e| e.kv.as_ref().map(|(k, v)| (k, v)))
    }
}

/// Iterator over live entries of a [`HashMap`] with mutable values.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .find_map(|e| e.kv.as_mut().map(|(k, v)| (&*k, v)))
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
