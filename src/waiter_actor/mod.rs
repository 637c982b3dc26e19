//! Waiters: place new orders and serve prepared ones.
//!
//! Each pass through the loop has two steps:
//!
//! 1. **Place.** Take a `place` permit, then ask the pipeline to place the next
//!    order. A placed order keeps its permit; a chef gives it back once the order is
//!    prepared. A rejected placement returns the permit straight away.
//! 2. **Serve.** Take a `serve` permit and serve one prepared order if there is one.
//!    Once every order has been placed there is nothing left to do but serve, so the
//!    waiter waits for the next prepared order instead of polling.
//!
//! The loop ends when `orders_served` reaches `number_of_orders`. The waiter that
//! sees this first fires the waiter signal, waking any peer still parked on a permit
//! or on the prepared queue.

use crate::framework::{CancellationToken, FrameworkError};
use crate::model::ActorKind;
use crate::pipeline::PipelineState;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Waiter {
    id: usize,
    state: Arc<PipelineState>,
}

/// Creates waiter `id` working against `state`.
pub fn new(id: usize, state: Arc<PipelineState>) -> Waiter {
    Waiter { id, state }
}

impl Waiter {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs until every order has been served or the waiters are told to stop.
    pub async fn run(self) {
        let kind = ActorKind::Waiter;
        let signal = self.state.waiter_signal();
        info!(%kind, id = self.id, "Actor started");

        while !(self.state.all_served() || signal.is_cancelled()) {
            match self.step(signal).await {
                Ok(true) => {}
                Ok(false) => tokio::task::yield_now().await,
                Err(FrameworkError::Cancelled) => {
                    debug!(%kind, id = self.id, "Wait cancelled");
                }
                Err(e) => {
                    warn!(%kind, id = self.id, error = %e, "Stopping early");
                    break;
                }
            }
        }

        signal.cancel();
        info!(%kind, id = self.id, served = self.state.orders_served(), "Actor finished");
    }

    /// One place-then-serve pass. Returns whether anything happened.
    async fn step(&self, signal: &CancellationToken) -> Result<bool, FrameworkError> {
        let mut progressed = false;

        let permit = self.state.place_permits().acquire(signal).await?;
        match self.state.place_order(self.id, signal).await? {
            Some(_) => {
                permit.consume();
                progressed = true;
            }
            None => drop(permit),
        }

        let _serving = self.state.serve_permits().acquire(signal).await?;
        let prepared = self.state.prepared_queue();
        let next = if self.state.all_placed() {
            Some(prepared.pop(signal).await?)
        } else {
            prepared.try_pop()
        };
        if let Some(order) = next {
            self.state.serve_order(self.id, order).await;
            progressed = true;
        }

        Ok(progressed)
    }
}
