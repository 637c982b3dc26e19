//! # Cooperative Cancellation
//!
//! Stop signals are [`CancellationToken`]s: sticky, cloneable, and waking every
//! task parked in `cancelled()` when fired.
//!
//! Blocking primitives in this framework race their own wait against the token
//! through [`guard`], so a parked actor unwinds with
//! [`FrameworkError::Cancelled`](crate::framework::FrameworkError::Cancelled)
//! instead of staying blocked forever.

use crate::framework::FrameworkError;
use std::future::Future;

pub use tokio_util::sync::CancellationToken;

/// Runs `fut` unless `token` fires first.
///
/// The token is polled before `fut`, so a fired token always wins and `fut` is
/// dropped without being polled again. `fut` must therefore be cancel-safe.
pub async fn guard<F: Future>(token: &CancellationToken, fut: F) -> Result<F::Output, FrameworkError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FrameworkError::Cancelled),
        output = fut => Ok(output),
    }
}
