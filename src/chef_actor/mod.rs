//! Chefs: turn placed orders into prepared ones.
//!
//! A chef holds a `chef` permit for each attempt. It first reserves a slot in the
//! prepared queue; with no slot free the attempt is skipped. Otherwise it takes the
//! oldest placed order, simulates preparation and commits the result through
//! [`PipelineState::complete_preparation`].
//!
//! Every attempt, skipped or not, ends by returning the chef permit and releasing
//! one `place` permit. That release is what lets waiters place again.

use crate::framework::{CancellationToken, FrameworkError};
use crate::model::ActorKind;
use crate::pipeline::PipelineState;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Chef {
    id: usize,
    state: Arc<PipelineState>,
}

/// Creates chef `id` working against `state`.
pub fn new(id: usize, state: Arc<PipelineState>) -> Chef {
    Chef { id, state }
}

impl Chef {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs until every order has been prepared or the chefs are told to stop.
    pub async fn run(self) {
        let kind = ActorKind::Chef;
        let signal = self.state.chef_signal();
        info!(%kind, id = self.id, "Actor started");

        while !(self.state.all_processed() || signal.is_cancelled()) {
            let permit = match self.state.chef_permits().acquire(signal).await {
                Ok(permit) => permit,
                Err(FrameworkError::Cancelled) => continue,
                Err(e) => {
                    warn!(%kind, id = self.id, error = %e, "Stopping early");
                    break;
                }
            };

            let outcome = self.prepare_next(signal).await;
            drop(permit);
            self.state.place_permits().release();

            match outcome {
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
        info!(%kind, id = self.id, processed = self.state.orders_processed(), "Actor finished");
    }

    /// Prepares one order if the prepared queue has room. Returns whether it did.
    async fn prepare_next(&self, signal: &CancellationToken) -> Result<bool, FrameworkError> {
        let Some(slot) = self.state.prepared_queue().try_reserve() else {
            return Ok(false);
        };
        // Cancelling here drops the reservation, so the queue is left as it was.
        let order = self.state.placement_queue().pop(signal).await?;
        self.state.prepare().await;
        self.state.complete_preparation(self.id, order, slot).await;
        Ok(true)
    }
}
