//! Generic coordination primitives for staged actor pipelines.
//!
//! Nothing in this module knows about restaurants. It provides the blocking
//! building blocks that actors share:
//!
//! # Main Components
//!
//! - [`BoundedQueue`] - Fixed-capacity FIFO handoff between stages, with slot reservation
//! - [`Permits`] - Counting admission control with a ceiling and RAII [`Permit`] guards
//! - [`CancellationToken`] - Stop signal accepted by every blocking call, raced in by [`guard`]
//! - [`FrameworkError`] - Common error type (`Cancelled`, `Closed`)

pub mod cancellation;
pub mod error;
pub mod permits;
pub mod queue;

pub use cancellation::{guard, CancellationToken};
pub use error::FrameworkError;
pub use permits::{Permit, Permits};
pub use queue::{BoundedQueue, QueueSlot};
