//! # Run Lifecycle & Orchestration
//!
//! This module drives a simulation from start to finish.
//!
//! **Key Responsibilities:**
//! 1. **State Construction** - Build the shared [`PipelineState`](crate::pipeline::PipelineState)
//! 2. **Actor Spawning** - Start every waiter and chef in its own task
//! 3. **Ordered Join** - Wait for all waiters, then for all chefs
//! 4. **Observability Setup** - Initialize tracing via [`setup_tracing`]
//!
//! ## Shutdown
//!
//! Nobody stops the actors from outside. Each kind stops itself: the first waiter
//! to see every order served fires the waiter signal, and the first chef to see
//! every order prepared fires the chef signal. Peers parked on a queue or a permit
//! wake up, drop what they were waiting for and exit. The coordinator only joins.
//!
//! Waiters are joined before chefs so that a failing waiter is reported without
//! first waiting on the kitchen.

pub mod restaurant;
pub mod tracing;

pub use restaurant::*;
pub use self::tracing::*;
