//! Fixed-capacity, push-and-evict sequence.
//!
//! Backs both the coherence sliding window and the gate-operation log: memory
//! stays bounded no matter how long a session runs, and appends are O(1).

use std::collections::VecDeque;
use std::collections::vec_deque;

use serde::{Deserialize, Serialize};

/// Ordered sequence holding at most `capacity` entries, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedLog<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `item`, returning the evicted oldest entry if the log was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest retained entry.
    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }

    /// Up to `n` entries, newest first.
    pub fn newest_first(&self, n: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().rev().take(n)
    }
}

impl<T> FromIterator<T> for BoundedLog<T> {
    /// Collects into a log sized to the iterator's length.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: VecDeque<T> = iter.into_iter().collect();
        Self {
            capacity: entries.len().max(1),
            entries,
        }
    }
}

impl<'a, T> IntoIterator for &'a BoundedLog<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut log = BoundedLog::new(3);
        assert_eq!(log.push(1), None);
        assert_eq!(log.push(2), None);
        assert_eq!(log.push(3), None);
        assert!(log.is_full());
        assert_eq!(log.push(4), Some(1));
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut log = BoundedLog::new(16);
        for i in 0..1000 {
            log.push(i);
            assert!(log.len() <= 16);
        }
        assert_eq!(log.oldest(), Some(&984));
        assert_eq!(log.latest(), Some(&999));
    }

    #[test]
    fn newest_first_is_reversed_and_truncated() {
        let mut log = BoundedLog::new(10);
        for i in 0..6 {
            log.push(i);
        }
        let recent: Vec<_> = log.newest_first(3).copied().collect();
        assert_eq!(recent, vec![5, 4, 3]);
        assert_eq!(log.newest_first(50).count(), 6);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut log = BoundedLog::new(0);
        log.push('a');
        log.push('b');
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.latest(), Some(&'b'));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn collect_sizes_capacity_to_input() {
        let log: BoundedLog<u32> = (0..50).collect();
        assert_eq!(log.capacity(), 50);
        assert!(log.is_full());
    }

    #[test]
    fn empty_log_has_no_endpoints() {
        let log: BoundedLog<u8> = BoundedLog::new(4);
        assert!(log.is_empty());
        assert_eq!(log.latest(), None);
        assert_eq!(log.oldest(), None);
    }
}
