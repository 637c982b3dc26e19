//! # Pipeline State
//!
//! One [`PipelineState`] is created per run and shared, behind an `Arc`, by every
//! waiter and chef. It owns:
//!
//! - the **placement queue** (waiters → chefs) and the **prepared queue**
//!   (chefs → waiters),
//! - the counters `orders_placed`, `orders_processed`, `orders_served` and
//!   `current_order_placed` (orders placed but not yet taken off the books by a chef),
//! - three permit pools: `place` (sized to the placement queue, refilled by chefs),
//!   `serve` and `chef` (both sized to the prepared queue),
//! - one [`CancellationToken`] per actor kind,
//! - the **sequencing lock**.
//!
//! Counters are atomics, so terminal checks read them without locking. Every
//! compound check-then-mutate step goes through [`PipelineState::place_order`] or
//! [`PipelineState::complete_preparation`], which hold the sequencing lock for the
//! whole step. Order ids therefore come out of placement as `0, 1, 2, ...` with no
//! gaps or duplicates, and no counter can pass `number_of_orders`.

use crate::config::SimulationConfig;
use crate::framework::{BoundedQueue, CancellationToken, FrameworkError, Permits, QueueSlot};
use crate::model::{ActorKind, OrderAction, OrderEvent, OrderId};
use crate::sink::EventSink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct PipelineState {
    config: SimulationConfig,
    placement: BoundedQueue<OrderId>,
    prepared: BoundedQueue<OrderId>,

    orders_placed: AtomicUsize,
    orders_processed: AtomicUsize,
    orders_served: AtomicUsize,
    current_order_placed: AtomicUsize,

    place_permits: Permits,
    serve_permits: Permits,
    chef_permits: Permits,

    waiters_done: CancellationToken,
    chefs_done: CancellationToken,

    sequencer: Mutex<()>,
    sink: Arc<dyn EventSink>,
}

/// Point-in-time view of the pipeline. Fields are read one by one, so a snapshot
/// taken mid-run is not a single atomic cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSnapshot {
    pub orders_placed: usize,
    pub orders_processed: usize,
    pub orders_served: usize,
    pub current_order_placed: usize,
    pub placement_queue_len: usize,
    pub prepared_queue_len: usize,
    pub place_permits_available: usize,
}

impl PipelineState {
    pub fn new(config: SimulationConfig, sink: Arc<dyn EventSink>) -> Self {
        let placement_size = config.size_of_order_placement_queue;
        let prepared_size = config.size_of_prepared_order_queue;
        Self {
            placement: BoundedQueue::new(placement_size),
            prepared: BoundedQueue::new(prepared_size),
            orders_placed: AtomicUsize::new(0),
            orders_processed: AtomicUsize::new(0),
            orders_served: AtomicUsize::new(0),
            current_order_placed: AtomicUsize::new(0),
            place_permits: Permits::new("place", placement_size),
            serve_permits: Permits::new("serve", prepared_size),
            chef_permits: Permits::new("chef", prepared_size),
            waiters_done: CancellationToken::new(),
            chefs_done: CancellationToken::new(),
            sequencer: Mutex::new(()),
            sink,
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn total_orders(&self) -> usize {
        self.config.number_of_orders
    }

    pub fn placement_queue(&self) -> &BoundedQueue<OrderId> {
        &self.placement
    }

    pub fn prepared_queue(&self) -> &BoundedQueue<OrderId> {
        &self.prepared
    }

    pub fn place_permits(&self) -> &Permits {
        &self.place_permits
    }

    pub fn serve_permits(&self) -> &Permits {
        &self.serve_permits
    }

    pub fn chef_permits(&self) -> &Permits {
        &self.chef_permits
    }

    /// Stop signal shared by all waiters.
    pub fn waiter_signal(&self) -> &CancellationToken {
        &self.waiters_done
    }

    /// Stop signal shared by all chefs.
    pub fn chef_signal(&self) -> &CancellationToken {
        &self.chefs_done
    }

    pub fn orders_placed(&self) -> usize {
        self.orders_placed.load(Ordering::SeqCst)
    }

    pub fn orders_processed(&self) -> usize {
        self.orders_processed.load(Ordering::SeqCst)
    }

    pub fn orders_served(&self) -> usize {
        self.orders_served.load(Ordering::SeqCst)
    }

    pub fn current_order_placed(&self) -> usize {
        self.current_order_placed.load(Ordering::SeqCst)
    }

    pub fn all_placed(&self) -> bool {
        self.orders_placed() >= self.total_orders()
    }

    pub fn all_processed(&self) -> bool {
        self.orders_processed() >= self.total_orders()
    }

    pub fn all_served(&self) -> bool {
        self.orders_served() >= self.total_orders()
    }

    /// Places the next order on behalf of a waiter.
    ///
    /// Under the sequencing lock: if fewer than `number_of_orders` orders have been
    /// placed and fewer than `size_of_order_placement_queue` are in flight, bumps the
    /// in-flight count, simulates placement, enqueues order `orders_placed`, logs it
    /// and bumps `orders_placed`. Returns `Ok(None)` when the guard rejects the step.
    ///
    /// A cancelled enqueue rolls the in-flight count back, leaving no trace.
    pub async fn place_order(
        &self,
        waiter_id: usize,
        cancel: &CancellationToken,
    ) -> Result<Option<OrderId>, FrameworkError> {
        let _sequence = self.sequencer.lock().await;

        let placed = self.orders_placed();
        if placed >= self.total_orders()
            || self.current_order_placed() >= self.placement.capacity()
        {
            return Ok(None);
        }

        self.current_order_placed.fetch_add(1, Ordering::SeqCst);
        simulate_work(self.config.time_of_order_placement).await;

        let order = OrderId(placed);
        // Cannot wait: in-flight orders bound the queue length, and the guard kept
        // in-flight below capacity.
        if let Err(e) = self.placement.push(order, cancel).await {
            self.current_order_placed.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        self.record(ActorKind::Waiter, waiter_id, OrderAction::Placed, order)
            .await;
        self.orders_placed.fetch_add(1, Ordering::SeqCst);
        Ok(Some(order))
    }

    /// Commits an order a chef has finished preparing.
    ///
    /// Under the sequencing lock: takes the order off the in-flight count, logs it,
    /// fills the prepared-queue slot the chef reserved earlier and bumps
    /// `orders_processed`. Never waits on a queue.
    ///
    /// The event is recorded before the order becomes visible to waiters, so an
    /// order's "Prepared" line always precedes its "Served" line.
    pub async fn complete_preparation(
        &self,
        chef_id: usize,
        order: OrderId,
        slot: QueueSlot<'_, OrderId>,
    ) {
        let _sequence = self.sequencer.lock().await;

        if self
            .current_order_placed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
        {
            warn!(chef_id, %order, "Prepared an order that was not in flight");
        }
        self.record(ActorKind::Chef, chef_id, OrderAction::Prepared, order)
            .await;
        slot.push(order);
        self.orders_processed.fetch_add(1, Ordering::SeqCst);
    }

    /// Serves an order a waiter has already taken off the prepared queue.
    pub async fn serve_order(&self, waiter_id: usize, order: OrderId) {
        simulate_work(self.config.time_of_order_serving).await;
        self.orders_served.fetch_add(1, Ordering::SeqCst);
        self.record(ActorKind::Waiter, waiter_id, OrderAction::Served, order)
            .await;
    }

    /// Simulated preparation time. Not a cancellation point.
    pub async fn prepare(&self) {
        simulate_work(self.config.time_of_order_preparation).await;
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            orders_placed: self.orders_placed(),
            orders_processed: self.orders_processed(),
            orders_served: self.orders_served(),
            current_order_placed: self.current_order_placed(),
            placement_queue_len: self.placement.len(),
            prepared_queue_len: self.prepared.len(),
            place_permits_available: self.place_permits.available(),
        }
    }

    async fn record(&self, kind: ActorKind, actor_id: usize, action: OrderAction, order: OrderId) {
        let event = OrderEvent::now(kind, actor_id, action, order);
        debug!(%kind, actor_id, %action, %order, "Event");
        if let Err(e) = self.sink.record(&event).await {
            warn!(%kind, actor_id, %order, error = %e, "Failed to record event");
        }
    }
}

impl std::fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineState")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// A zero duration skips the timer entirely instead of waiting for the next tick.
async fn simulate_work(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
