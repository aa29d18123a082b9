use std::collections::VecDeque;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("dequeue from an empty queue")]
pub struct EmptyQueueError;

/// First-in first-out buffer backing the breadth-first traversal.
///
/// All operations are amortized *O(1)*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T>(VecDeque<T>);

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self(VecDeque::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(VecDeque::with_capacity(capacity))
    }

    pub fn enqueue(&mut self, item: T) {
        self.0.push_back(item);
    }

    /// Removes and returns the oldest item.
    pub fn dequeue(&mut self) -> Result<T, EmptyQueueError> {
        self.0.pop_front().ok_or(EmptyQueueError)
    }

    /// Returns the item that [`dequeue`](Queue::dequeue) would return next.
    pub fn peek(&self) -> Option<&T> {
        self.0.front()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
