//! # Admission Permits
//!
//! A [`Permits`] pool is a counting semaphore with a ceiling. Acquiring yields a
//! [`Permit`] guard that goes back to the pool when dropped. A guard can instead be
//! [`consume`](Permit::consume)d, in which case some other actor is expected to call
//! [`Permits::release`] later. That handoff is how one stage of a pipeline throttles
//! the stage in front of it.
//!
//! Releases are capped: the number of available permits never exceeds the ceiling
//! the pool was created with.

use crate::framework::cancellation::guard;
use crate::framework::{CancellationToken, FrameworkError};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Semaphore;
use tracing::trace;

#[derive(Debug)]
pub struct Permits {
    name: &'static str,
    semaphore: Semaphore,
    ceiling: usize,
    release_lock: Mutex<()>,
}

impl Permits {
    pub fn new(name: &'static str, ceiling: usize) -> Self {
        Self {
            name,
            semaphore: Semaphore::new(ceiling),
            ceiling,
            release_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a permit. Waiters are served in FIFO order.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<Permit<'_>, FrameworkError> {
        let permit = guard(cancel, self.semaphore.acquire()).await??;
        permit.forget();
        trace!(pool = self.name, available = self.available(), "Permit acquired");
        Ok(Permit {
            pool: self,
            consumed: false,
        })
    }

    /// Returns one permit to the pool unless it is already full.
    ///
    /// Returns false when the release was dropped because of the ceiling.
    pub fn release(&self) -> bool {
        let _guard = self
            .release_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.semaphore.available_permits() >= self.ceiling {
            trace!(pool = self.name, "Release ignored at ceiling");
            return false;
        }
        self.semaphore.add_permits(1);
        true
    }
}

/// A held admission permit. Returned to its pool on drop unless consumed.
#[derive(Debug)]
#[must_use = "dropping a permit releases it immediately"]
pub struct Permit<'a> {
    pool: &'a Permits,
    consumed: bool,
}

impl Permit<'_> {
    /// Keeps the permit out of the pool; someone else will [`Permits::release`] it.
    pub fn consume(mut self) {
        self.consumed = true;
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.consumed {
            self.pool.release();
        }
    }
}
