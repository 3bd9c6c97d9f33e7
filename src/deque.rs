//! Deque: power-of-two ring buffer with O(1) push/pop at both ends.

use crate::error::{check_index, CollectionError, Result};
use core::fmt;
use core::ops::{Index, IndexMut};

const DEFAULT_CAPACITY: usize = 4;

/// Double-ended queue over a circular buffer.
///
/// Logical element `i` lives at `(head + i) & (capacity - 1)`; the buffer
/// length is always a power of two so wrapping is a mask, not a modulo.
pub struct Deque<T> {
    items: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T> Deque<T> {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_CAPACITY)
    }

    /// Capacity is rounded up to the next power of two; zero selects the default.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            Self::with_buffer(DEFAULT_CAPACITY)
        } else {
            Self::with_buffer(capacity.next_power_of_two())
        }
    }

    fn with_buffer(len: usize) -> Self {
        debug_assert!(len.is_power_of_two());
        Self {
            items: empty_buffer(len),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }
        self.items[self.wrap(self.head + index)].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.count {
            return None;
        }
        let slot = self.wrap(self.head + index);
        self.items[slot].as_mut()
    }

    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        check_index(index, self.count)?;
        let slot = self.wrap(self.head + index);
        self.items[slot] = Some(item);
        Ok(())
    }

    pub fn push_front(&mut self, item: T) {
        if self.count == self.items.len() {
            self.grow();
        }
        self.head = self.wrap(self.head.wrapping_sub(1));
        self.items[self.head] = Some(item);
        self.count += 1;
    }

    pub fn push_back(&mut self, item: T) {
        if self.count == self.items.len() {
            self.grow();
        }
        self.items[self.tail] = Some(item);
        self.tail = self.wrap(self.tail + 1);
        self.count += 1;
    }

    pub fn pop_front(&mut self) -> Result<T> {
        self.try_pop_front().ok_or(CollectionError::EmptyCollection)
    }

    pub fn pop_back(&mut self) -> Result<T> {
        self.try_pop_back().ok_or(CollectionError::EmptyCollection)
    }

    pub fn try_pop_front(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let item = self.items[self.head].take();
        self.head = self.wrap(self.head + 1);
        self.count -= 1;
        item
    }

    pub fn try_pop_back(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        self.tail = self.wrap(self.tail.wrapping_sub(1));
        let item = self.items[self.tail].take();
        self.count -= 1;
        item
    }

    pub fn peek_front(&self) -> Result<&T> {
        self.try_peek_front().ok_or(CollectionError::EmptyCollection)
    }

    pub fn peek_back(&self) -> Result<&T> {
        self.try_peek_back().ok_or(CollectionError::EmptyCollection)
    }

    pub fn try_peek_front(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.items[self.head].as_ref()
    }

    pub fn try_peek_back(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.items[self.wrap(self.tail.wrapping_sub(1))].as_ref()
    }

    /// Remove the element at logical `index`, shifting whichever side is shorter.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        check_index(index, self.count)?;
        let slot = self.wrap(self.head + index);
        let removed = self.items[slot].take();

        if index < self.count / 2 {
            // Front half: slide [0, index) back by one and advance head.
            for i in (1..=index).rev() {
                let curr = self.wrap(self.head + i);
                let prev = self.wrap(self.head + i - 1);
                self.items[curr] = self.items[prev].take();
            }
            self.head = self.wrap(self.head + 1);
        } else {
            for i in index..self.count - 1 {
                let curr = self.wrap(self.head + i);
                let next = self.wrap(self.head + i + 1);
                self.items[curr] = self.items[next].take();
            }
            self.tail = self.wrap(self.tail.wrapping_sub(1));
        }
        self.count -= 1;

        removed.ok_or(CollectionError::ConcurrentOperation)
    }

    pub fn clear(&mut self) {
        if self.count > 0 {
            self.items.iter_mut().for_each(|slot| *slot = None);
            self.head = 0;
            self.tail = 0;
            self.count = 0;
        }
    }

    /// Front-to-back iteration.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            index: 0,
        }
    }

    #[inline]
    fn wrap(&self, index: usize) -> usize {
        index & (self.items.len() - 1)
    }

    /// Double the buffer and linearize the wrapped contents to start at slot 0.
    fn grow(&mut self) {
        let mut items = empty_buffer(self.items.len() * 2);
        for (i, slot) in items.iter_mut().enumerate().take(self.count) {
            let from = self.wrap(self.head + i);
            *slot = self.items[from].take();
        }
        self.items = items;
        self.head = 0;
        self.tail = self.count;
    }
}

impl<T: PartialEq> Deque<T> {
    pub fn position(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Linear scan followed by [`Deque::remove_at`].
    pub fn remove(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(i) => self.remove_at(i).is_ok(),
            None => false,
        }
    }
}

fn empty_buffer<T>(len: usize) -> Vec<Option<T>> {
    let mut items = Vec::with_capacity(len);
    items.resize_with(len, || None);
    items
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "{}",
                CollectionError::IndexOutOfRange {
                    index,
                    len: self.count
                }
            ),
        }
    }
}

impl<T> IndexMut<usize> for Deque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.count;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("{}", CollectionError::IndexOutOfRange { index, len }),
        }
    }
}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Deque::new();
        deque.extend(iter);
        deque
    }
}

/// Iterator over a [`Deque`] from front to back.
pub struct Iter<'a, T> {
    deque: &'a Deque<T>,
    index: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.deque.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.deque.count.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
