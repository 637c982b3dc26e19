//! Orders and the events recorded as they move through the pipeline.
//!
//! An order carries no payload: its identity is its position in the placement
//! sequence, starting at zero.

use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub usize);

impl From<usize> for OrderId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two kinds of actor working the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Waiter,
    Chef,
}

impl Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorKind::Waiter => f.write_str("Waiter"),
            ActorKind::Chef => f.write_str("Chef"),
        }
    }
}

/// What happened to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    Placed,
    Prepared,
    Served,
}

impl Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderAction::Placed => f.write_str("Order Placed"),
            OrderAction::Prepared => f.write_str("Order Prepared"),
            OrderAction::Served => f.write_str("Order Served"),
        }
    }
}

/// One line of the order log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u128,
    pub kind: ActorKind,
    pub actor_id: usize,
    pub action: OrderAction,
    pub order: OrderId,
}

impl OrderEvent {
    /// Creates an event stamped with the current wall-clock time.
    pub fn now(kind: ActorKind, actor_id: usize, action: OrderAction, order: OrderId) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self {
            timestamp,
            kind,
            actor_id,
            action,
            order,
        }
    }
}

/// `[<timestamp>] <Kind> <id>: <Action> - Order <n>`
impl Display for OrderEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}: {} - Order {}",
            self.timestamp, self.kind, self.actor_id, self.action, self.order
        )
    }
}
