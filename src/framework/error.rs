//! # Framework Errors
//!
//! Errors surfaced by the coordination primitives. Cancellation is the common case
//! and is expected during shutdown; callers treat it as a signal, not a fault.

/// Errors that can occur while waiting on a queue or a permit pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    /// The waiting actor was asked to stop before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
    /// The underlying semaphore was closed.
    #[error("primitive closed")]
    Closed,
}

impl FrameworkError {
    /// Returns true if this is a cooperative cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FrameworkError::Cancelled)
    }
}

impl From<tokio::sync::AcquireError> for FrameworkError {
    fn from(_: tokio::sync::AcquireError) -> Self {
        FrameworkError::Closed
    }
}
