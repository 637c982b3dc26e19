//! Shared state of the two-stage order pipeline.
//!
//! # Main Components
//!
//! - [`PipelineState`] - Queues, counters, permits and the sequencing lock shared by every actor
//! - [`PipelineSnapshot`] - Point-in-time view of the counters and queue lengths

pub mod state;

pub use state::*;
