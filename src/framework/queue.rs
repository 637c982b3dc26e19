//! # Bounded Handoff Queue
//!
//! A multi-producer, multi-consumer FIFO with a fixed capacity. Two semaphores track
//! the free slots and the filled slots; the items themselves live in a short-lived
//! `std::sync::Mutex` that is never held across an `.await`.
//!
//! Besides blocking [`push`](BoundedQueue::push) / [`pop`](BoundedQueue::pop), the
//! queue can hand out a [`QueueSlot`]: a reservation of one free slot that can later
//! be filled without waiting. Dropping an unused slot gives the space back.

use crate::framework::cancellation::guard;
use crate::framework::{CancellationToken, FrameworkError};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Debug)]
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    free: Semaphore,
    filled: Semaphore,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            free: Semaphore::new(capacity),
            filled: Semaphore::new(0),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free slots that are neither filled nor reserved.
    pub fn remaining_capacity(&self) -> usize {
        self.free.available_permits()
    }

    /// Appends `item`, waiting for a free slot if the queue is full.
    pub async fn push(&self, item: T, cancel: &CancellationToken) -> Result<(), FrameworkError> {
        let permit = guard(cancel, self.free.acquire()).await??;
        permit.forget();
        self.insert(item);
        Ok(())
    }

    /// Removes the oldest item, waiting for one if the queue is empty.
    pub async fn pop(&self, cancel: &CancellationToken) -> Result<T, FrameworkError> {
        let permit = guard(cancel, self.filled.acquire()).await??;
        permit.forget();
        self.take()
    }

    /// Removes the oldest item if one is ready right now.
    pub fn try_pop(&self) -> Option<T> {
        let permit = self.filled.try_acquire().ok()?;
        permit.forget();
        self.take().ok()
    }

    /// Reserves one free slot without waiting.
    pub fn try_reserve(&self) -> Option<QueueSlot<'_, T>> {
        let permit = self.free.try_acquire().ok()?;
        Some(QueueSlot { queue: self, permit })
    }

    fn insert(&self, item: T) {
        self.lock().push_back(item);
        self.filled.add_permits(1);
    }

    // Called only after a `filled` permit was forgotten, so an item is present.
    fn take(&self) -> Result<T, FrameworkError> {
        let item = self.lock().pop_front().ok_or(FrameworkError::Closed)?;
        self.free.add_permits(1);
        Ok(item)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A reserved slot in a [`BoundedQueue`].
#[derive(Debug)]
pub struct QueueSlot<'a, T> {
    queue: &'a BoundedQueue<T>,
    permit: SemaphorePermit<'a>,
}

impl<T> QueueSlot<'_, T> {
    /// Fills the reserved slot. Never waits.
    pub fn push(self, item: T) {
        self.permit.forget();
        self.queue.insert(item);
    }
}
