//! # Observability & Tracing
//!
//! Diagnostics go through the `tracing` crate. They are separate from the order
//! event log, which is a domain artifact written through
//! [`EventSink`](crate::sink::EventSink).
//!
//! ## What Gets Traced
//!
//! - **Run Lifecycle**: Opening the restaurant, each kind finishing, the final report
//! - **Actor Lifecycle**: Startup and shutdown of every waiter and chef
//! - **Order Events**: Every placed, prepared and served order (at `debug`)
//! - **Permit Traffic**: Acquire/release of admission permits (at `trace`)
//! - **Failures**: Event-log write errors (at `warn`), failed actor tasks (at `error`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only (default)
//! cargo run
//!
//! # Every order event
//! RUST_LOG=debug cargo run
//!
//! # Permit traffic too
//! RUST_LOG=kitchen_sim=trace cargo run
//! ```
//!
//! With `RUST_LOG=debug` the output looks like:
//!
//! ```text
//! INFO Opening restaurant chefs=2 waiters=2 orders=5
//! INFO Actor started kind=Waiter id=0
//! INFO Actor started kind=Chef id=0
//! DEBUG Event kind=Waiter actor_id=0 action=Order Placed order=0
//! DEBUG Event kind=Chef actor_id=0 action=Order Prepared order=0
//! DEBUG Event kind=Waiter actor_id=1 action=Order Served order=0
//! ```
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Actors identify themselves with kind/id fields
        .compact()
        .init();
}
