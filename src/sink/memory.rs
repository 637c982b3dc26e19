use crate::model::{OrderAction, OrderEvent};
use crate::sink::{EventSink, SinkError};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Keeps every recorded event in arrival order.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<OrderEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    pub fn events(&self) -> Vec<OrderEvent> {
        self.lock().clone()
    }

    /// Events with the given action, in arrival order.
    pub fn with_action(&self, action: OrderAction) -> Vec<OrderEvent> {
        self.lock()
            .iter()
            .filter(|event| event.action == action)
            .cloned()
            .collect()
    }

    pub fn count(&self, action: OrderAction) -> usize {
        self.lock().iter().filter(|event| event.action == action).count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Formatted log lines, as [`FileEventLog`](crate::sink::FileEventLog) would write them.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OrderEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventSink for MemoryEventLog {
    async fn record(&self, event: &OrderEvent) -> Result<(), SinkError> {
        self.lock().push(event.clone());
        Ok(())
    }
}
