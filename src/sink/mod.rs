//! Destinations for the order event log.
//!
//! Actors hand every [`OrderEvent`] to an [`EventSink`]. A failed write is reported
//! by the caller and otherwise ignored: the order still counts as placed, prepared
//! or served.
//!
//! - [`FileEventLog`] appends one line per event to a text file.
//! - [`MemoryEventLog`] keeps events in memory for inspection.

pub mod file;
pub mod memory;

pub use file::FileEventLog;
pub use memory::MemoryEventLog;

use crate::model::OrderEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while recording an event.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open event log {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write event log: {0}")]
    Write(#[from] std::io::Error),
}

/// Append-only receiver of order events.
///
/// Implementations must write each event as a unit: concurrent callers never
/// observe interleaved partial records.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record(&self, event: &OrderEvent) -> Result<(), SinkError>;
}
