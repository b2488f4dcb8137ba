//! Fixed-capacity FIFO ring buffer
//!
//! Combat history (damage events, heal events, position samples) must stay
//! bounded no matter how long an entity stays in view. [`RingBuffer`] stores
//! at most `N` items inline; pushing into a full buffer overwrites the oldest.
//!
//! # Rust Learning Notes
//!
//! The capacity is a const generic (`const N: usize`), so each buffer is a
//! plain array inside its owning struct and never allocates.

/// A bounded FIFO that overwrites its oldest entry when full
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingBuffer<T: Copy, const N: usize> {
    items: [Option<T>; N],
    /// Index of the oldest item
    head: usize,
    len: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        RingBuffer {
            items: [None; N],
            head: 0,
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Appends an item, overwriting the oldest when full
    pub fn push(&mut self, item: T) {
        if N == 0 {
            return;
        }
        let tail = (self.head + self.len) % N;
        self.items[tail] = Some(item);
        if self.len == N {
            self.head = (self.head + 1) % N;
        } else {
            self.len += 1;
        }
    }

    /// Removes and returns the oldest item
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.items[self.head].take();
        self.head = (self.head + 1) % N;
        self.len -= 1;
        item
    }

    /// Oldest item
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Newest item
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Item `index` positions after the oldest
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.items[(self.head + index) % N].as_ref()
    }

    /// Drops oldest items while `predicate` holds
    pub fn drop_front_while(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        while let Some(front) = self.front() {
            if !predicate(front) {
                break;
            }
            self.pop_front();
        }
    }

    /// Keeps only the newest `keep` items
    pub fn keep_newest(&mut self, keep: usize) {
        while self.len > keep {
            self.pop_front();
        }
    }

    /// Iterates from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iterate_in_order() {
        let mut ring: RingBuffer<u32, 4> = RingBuffer::new();
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(ring.front(), Some(&1));
        assert_eq!(ring.back(), Some(&3));
    }

    #[test]
    fn test_overwrites_oldest_when_full() {
        let mut ring: RingBuffer<u32, 3> = RingBuffer::new();
        for i in 0..5 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_drop_front_while() {
        let mut ring: RingBuffer<u32, 8> = RingBuffer::new();
        for i in [10, 20, 30, 40] {
            ring.push(i);
        }
        ring.drop_front_while(|v| *v < 25);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![30, 40]);
    }

    #[test]
    fn test_keep_newest() {
        let mut ring: RingBuffer<u32, 8> = RingBuffer::new();
        for i in 0..6 {
            ring.push(i);
        }
        ring.keep_newest(2);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![4, 5]);
        ring.keep_newest(10);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_empty_buffer() {
        let mut ring: RingBuffer<u32, 2> = RingBuffer::default();
        assert!(ring.is_empty());
        assert_eq!(ring.back(), None);
        assert_eq!(ring.pop_front(), None);
        ring.push(7);
        ring.clear();
        assert!(ring.is_empty());
    }
}
