//! Vector: contiguous growable buffer with stack-style push/pop, swap-remove,
//! explicit capacity control and versioned cursors.

use crate::error::{check_index, CollectionError, Result};
use core::fmt;
use core::ops::{Index, IndexMut};

const DEFAULT_CAPACITY: usize = 4;

/// Growable array. Capacity doubles (starting at 4) when a push finds it full.
///
/// Every structural mutation bumps an internal version; a [`Cursor`] taken
/// before the mutation fails with [`CollectionError::InvalidEnumeration`] on
/// its next step.
#[derive(Clone)]
pub struct Vector<T> {
    items: Vec<T>,
    version: u32,
}

impl<T> Vector<T> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            version: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Reallocate to exactly `capacity` slots (the allocator may round up).
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        let count = self.items.len();
        if capacity < count {
            return Err(CollectionError::CapacityBelowCount { capacity, count });
        }
        let current = self.items.capacity();
        if capacity > current {
            self.items.reserve_exact(capacity - count);
        } else if capacity < current {
            self.items.shrink_to(capacity);
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        check_index(index, self.items.len())?;
        self.items[index] = item;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.version = self.version.wrapping_add(1);
        if self.items.len() == self.items.capacity() {
            self.grow(self.items.len() + 1);
        }
        self.items.push(item);
    }

    pub fn push_range<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = items.into_iter();
        let (lower, _) = iter.size_hint();
        if self.items.capacity() - self.items.len() < lower {
            self.grow(self.items.len() + lower);
        }
        self.items.extend(iter);
        self.version = self.version.wrapping_add(1);
    }

    /// Insert at `index`, shifting later elements back. `index == len` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        let len = self.items.len();
        if index > len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        if len == self.items.capacity() {
            self.grow(len + 1);
        }
        self.items.insert(index, item);
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    pub fn insert_range<I>(&mut self, index: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.items.len();
        if index > len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        let iter = items.into_iter();
        let (lower, _) = iter.size_hint();
        if self.items.capacity() - len < lower {
            self.grow(len + lower);
        }
        let _ = self.items.splice(index..index, iter);
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    pub fn peek(&self) -> Result<&T> {
        self.items.last().ok_or(CollectionError::EmptyCollection)
    }

    #[inline]
    pub fn try_peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn pop(&mut self) -> Result<T> {
        self.try_pop().ok_or(CollectionError::EmptyCollection)
    }

    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        self.version = self.version.wrapping_add(1);
        Some(item)
    }

    /// Order-preserving removal; shifts the tail down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        check_index(index, self.items.len())?;
        self.version = self.version.wrapping_add(1);
        Ok(self.items.remove(index))
    }

    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let len = self.items.len();
        if index > len || len - index < count {
            return Err(CollectionError::InvalidRange { index, count, len });
        }
        if count > 0 {
            self.items.drain(index..index + count);
            self.version = self.version.wrapping_add(1);
        }
        Ok(())
    }

    /// O(1) removal: the last element moves into `index`. Order is not kept.
    pub fn swap_remove_at(&mut self, index: usize) -> Result<T> {
        check_index(index, self.items.len())?;
        self.version = self.version.wrapping_add(1);
        Ok(self.items.swap_remove(index))
    }

    pub fn clear(&mut self) {
        self.version = self.version.wrapping_add(1);
        self.items.clear();
    }

    /// Shrink to the current count unless the buffer is at least 90% full.
    pub fn trim_excess(&mut self) {
        let threshold = (self.items.capacity() as f64 * 0.9) as usize;
        if self.items.len() < threshold {
            self.items.shrink_to_fit();
        }
    }

    /// Grow so that at least `capacity` slots exist; returns the resulting capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> usize {
        if self.items.capacity() < capacity {
            self.grow(capacity);
        }
        self.items.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.version = self.version.wrapping_add(1);
        self.items.iter_mut()
    }

    /// Start a detached enumeration; see [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        Cursor {
            index: 0,
            version: self.version,
        }
    }

    fn grow(&mut self, required: usize) {
        let capacity = self.items.capacity();
        debug_assert!(capacity < required);
        let doubled = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity.saturating_mul(2)
        };
        let target = doubled.max(required);
        self.items.reserve_exact(target - self.items.len());
    }
}

impl<T: PartialEq> Vector<T> {
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| x == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        !self.items.is_empty() && self.index_of(item).is_some()
    }

    pub fn remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(i) => self.remove_at(i).is_ok(),
            None => false,
        }
    }

    pub fn swap_remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(i) => self.swap_remove_at(i).is_ok(),
            None => false,
        }
    }
}

/// Enumeration position that does not borrow the vector between steps.
///
/// Each step validates that the vector has not been structurally mutated since
/// the cursor was taken (or last reset).
#[derive(Copy, Clone, Debug)]
pub struct Cursor {
    index: usize,
    version: u32,
}

impl Cursor {
    pub fn next<'a, T>(&mut self, vector: &'a Vector<T>) -> Result<Option<&'a T>> {
        if self.version != vector.version {
            return Err(CollectionError::InvalidEnumeration);
        }
        match vector.items.get(self.index) {
            Some(item) => {
                self.index += 1;
                Ok(Some(item))
            }
            None => {
                self.index = vector.items.len() + 1;
                Ok(None)
            }
        }
    }

    pub fn reset<T>(&mut self, vector: &Vector<T>) -> Result<()> {
        if self.version != vector.version {
            return Err(CollectionError::InvalidEnumeration);
        }
        self.index = 0;
        Ok(())
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.items.get(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                CollectionError::IndexOutOfRange {
                    index,
                    len: self.items.len()
                }
            ),
        }
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.items.len();
        self.version = self.version.wrapping_add(1);
        match self.items.get_mut(index) {
            Some(item) => item,
            None => panic!("{}", CollectionError::IndexOutOfRange { index, len }),
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            version: 0,
        }
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_range(iter);
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, version: 0 }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut v = Vector::new();
        v.push(1);
        v.push(2);
        v.push(3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.pop(), Ok(3));
        assert_eq!(v.len(), 2);
        assert_eq!(v.try_pop(), Some(2));
        assert_eq!(v.try_pop(), Some(1));
        assert_eq!(v.try_pop(), None);
        assert_eq!(v.pop(), Err(CollectionError::EmptyCollection));
    }

    #[test]
    fn first_push_allocates_default_capacity_then_doubles() {
        let mut v = Vector::new();
        assert_eq!(v.capacity(), 0);
        v.push(0u64);
        assert!(v.capacity() >= DEFAULT_CAPACITY);
        let first = v.capacity();
        for i in 1..=first as u64 {
            v.push(i);
        }
        assert!(v.capacity() >= 2 * first);
    }

    #[test]
    fn index_bounds_are_checked() {
        let mut v: Vector<i32> = [10, 20].into_iter().collect();
        assert_eq!(v.get(1), Some(&20));
        assert_eq!(v.get(2), None);
        assert_eq!(
            v.set(2, 5),
            Err(CollectionError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            v.remove_at(7),
            Err(CollectionError::IndexOutOfRange { index: 7, len: 2 })
        );
        v[0] = 11;
        assert_eq!(v.as_slice(), &[11, 20]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_operator_panics_out_of_range() {
        let v: Vector<i32> = Vector::new();
        let _ = v[0];
    }

    #[test]
    fn remove_at_preserves_order_swap_remove_does_not() {
        let mut v: Vector<i32> = (0..5).collect();
        assert_eq!(v.remove_at(1), Ok(1));
        assert_eq!(v.as_slice(), &[0, 2, 3, 4]);
        assert_eq!(v.swap_remove_at(0), Ok(0));
        assert_eq!(v.as_slice(), &[4, 2, 3]);
        assert!(v.swap_remove(&2));
        assert_eq!(v.as_slice(), &[4, 3]);
        assert!(!v.remove(&99));
    }

    #[test]
    fn insert_and_ranges() {
        let mut v: Vector<i32> = vec![1, 5].into();
        v.insert(1, 2).unwrap();
        v.insert_range(2, [3, 4]).unwrap();
        v.insert(5, 6).unwrap();
        assert_eq!(v.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert!(v.insert(9, 0).is_err());

        v.remove_range(1, 3).unwrap();
        assert_eq!(v.as_slice(), &[1, 5, 6]);
        assert_eq!(
            v.remove_range(2, 2),
            Err(CollectionError::InvalidRange {
                index: 2,
                count: 2,
                len: 3
            })
        );
    }

    #[test]
    fn contains_and_index_of_scan_linearly() {
        let v: Vector<&str> = ["a", "b", "c"].into_iter().collect();
        assert_eq!(v.index_of(&"c"), Some(2));
        assert!(v.contains(&"b"));
        assert!(!v.contains(&"z"));
    }

    #[test]
    fn cursor_fails_after_mutation() {
        let mut v: Vector<i32> = (0..3).collect();
        let mut c = v.cursor();
        assert_eq!(c.next(&v), Ok(Some(&0)));
        v.push(3);
        assert_eq!(c.next(&v), Err(CollectionError::InvalidEnumeration));
        assert_eq!(c.reset(&v), Err(CollectionError::InvalidEnumeration));
    }

    #[test]
    fn cursor_walks_all_elements_then_stops() {
        let v: Vector<i32> = (0..3).collect();
        let mut c = v.cursor();
        let mut seen = Vec::new();
        while let Some(x) = c.next(&v).unwrap() {
            seen.push(*x);
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(c.next(&v), Ok(None));
        c.reset(&v).unwrap();
        assert_eq!(c.next(&v), Ok(Some(&0)));
    }

    #[test]
    fn capacity_management() {
        let mut v: Vector<i32> = Vector::with_capacity(2);
        v.push(1);
        v.push(2);
        assert_eq!(
            v.set_capacity(1),
            Err(CollectionError::CapacityBelowCount {
                capacity: 1,
                count: 2
            })
        );
        assert!(v.ensure_capacity(32) >= 32);
        v.trim_excess();
        assert!(v.capacity() < 32);
        assert_eq!(v.as_slice(), &[1, 2]);
    }
}
