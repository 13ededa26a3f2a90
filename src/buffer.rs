//! Bounded FIFO and LIFO buffers.
//!
//! Both carry an explicit capacity and an [`Overflow`] policy deciding what happens to a
//! push into a full buffer. Taking from an empty buffer yields `None`; callers are expected
//! to check `is_empty` before presenting an item.

use std::collections::VecDeque;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Refuse the new item.
    #[default]
    Reject,
    /// Drop the oldest item to make room.
    Evict,
}

/// What happened to an item handed to a buffer.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push<T> {
    Accepted,
    /// The item was stored and this one was dropped to make room.
    Evicted(T),
    /// The buffer was full; the item is handed back.
    Rejected(T),
}

impl<T> Push<T> {
    pub fn is_stored(&self) -> bool {
        !matches!(self, Push::Rejected(_))
    }
}

#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
    capacity: usize,
    overflow: Overflow,
}

impl<T> Queue<T> {
    /// `capacity` is clamped to at least one item.
    pub fn new(capacity: usize, overflow: Overflow) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            overflow,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Appends at the tail. A full queue either refuses the item or evicts its head.
    pub fn enqueue(&mut self, item: T) -> Push<T> {
        if !self.is_full() {
            self.items.push_back(item);
            return Push::Accepted;
        }

        match self.overflow {
            Overflow::Reject => Push::Rejected(item),
            Overflow::Evict => {
                warn!(capacity = self.capacity, "queue full, evicting head");
                let evicted = self.items.pop_front();
                self.items.push_back(item);
                match evicted {
                    Some(evicted) => Push::Evicted(evicted),
                    None => Push::Accepted,
                }
            }
        }
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: VecDeque<T>,
    capacity: usize,
    overflow: Overflow,
}

impl<T> Stack<T> {
    /// `capacity` is clamped to at least one item.
    pub fn new(capacity: usize, overflow: Overflow) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            overflow,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes on top. A full stack either refuses the item or forgets its bottom.
    pub fn push(&mut self, item: T) -> Push<T> {
        if !self.is_full() {
            self.items.push_back(item);
            return Push::Accepted;
        }

        match self.overflow {
            Overflow::Reject => Push::Rejected(item),
            Overflow::Evict => {
                warn!(capacity = self.capacity, "stack full, evicting bottom");
                let evicted = self.items.pop_front();
                self.items.push_back(item);
                match evicted {
                    Some(evicted) => Push::Evicted(evicted),
                    None => Push::Accepted,
                }
            }
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_queue() {
        let mut queue = Queue::<u8>::new(4, Overflow::Reject);
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn empty_stack() {
        let mut stack = Stack::<u8>::new(4, Overflow::Reject);
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn queue_peek_does_not_remove() {
        let mut queue = Queue::new(4, Overflow::Reject);
        assert_eq!(queue.enqueue('a'), Push::Accepted);
        assert_eq!(queue.enqueue('b'), Push::Accepted);
        assert_eq!(queue.peek(), Some(&'a'));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn full_queue_rejects() {
        let mut queue = Queue::new(2, Overflow::Reject);
        assert!(queue.enqueue(1).is_stored());
        assert!(queue.enqueue(2).is_stored());
        assert_eq!(queue.enqueue(3), Push::Rejected(3));
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn full_queue_evicts_head() {
        let mut queue = Queue::new(2, Overflow::Evict);
        let _ = queue.enqueue(1);
        let _ = queue.enqueue(2);
        assert_eq!(queue.enqueue(3), Push::Evicted(1));
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn full_stack_rejects() {
        let mut stack = Stack::new(1, Overflow::Reject);
        assert_eq!(stack.push("a"), Push::Accepted);
        assert_eq!(stack.push("b"), Push::Rejected("b"));
        assert_eq!(stack.peek(), Some(&"a"));
    }

    #[test]
    fn full_stack_forgets_bottom() {
        let mut stack = Stack::new(2, Overflow::Evict);
        let _ = stack.push(1);
        let _ = stack.push(2);
        assert_eq!(stack.push(3), Push::Evicted(1));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let queue = Queue::<u8>::new(0, Overflow::Reject);
        let stack = Stack::<u8>::new(0, Overflow::Reject);
        assert_eq!(queue.capacity(), 1);
        assert_eq!(stack.capacity(), 1);
    }

    proptest! {
        #[test]
        fn queue_is_fifo(items in prop::collection::vec(any::<i32>(), 0..50)) {
            let mut queue = Queue::new(items.len(), Overflow::Reject);
            for &item in &items {
                prop_assert!(queue.enqueue(item).is_stored());
            }
            let drained: Vec<i32> = std::iter::from_fn(|| queue.dequeue()).collect();
            prop_assert_eq!(drained, items);
        }

        #[test]
        fn stack_is_lifo(items in prop::collection::vec(any::<i32>(), 0..50)) {
            let mut stack = Stack::new(items.len(), Overflow::Reject);
            for &item in &items {
                prop_assert!(stack.push(item).is_stored());
            }
            let drained: Vec<i32> = std::iter::from_fn(|| stack.pop()).collect();
            let mut reversed = items;
            reversed.reverse();
            prop_assert_eq!(drained, reversed);
        }
    }
}
