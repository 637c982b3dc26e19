//! # Kitchen Sim
//!
//! > **A two-stage order pipeline run by concurrent actors.**
//!
//! Waiters place orders into a bounded placement queue and serve them from a bounded
//! prepared queue. Chefs move orders from one queue to the other. The run ends once
//! a fixed number of orders has been placed, prepared and served, and every actor
//! has been joined.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Shared State, Narrow Mutation
//!
//! All actors hold an `Arc` to the same [`PipelineState`](pipeline::PipelineState).
//! Counters are atomics that anyone may read; anything that checks a counter and then
//! changes it goes through an accessor that holds the sequencing lock for the whole
//! step. Order ids are handed out in order, without gaps, and never past the total.
//!
//! ### Back-Pressure Through Permits
//!
//! A waiter needs a `place` permit to place an order, and that permit is only given
//! back by a chef once the order is prepared. The kitchen therefore sets the pace at
//! which waiters may take new orders.
//!
//! ### Cooperative Shutdown
//!
//! Every blocking call (queue push/pop, permit acquire) takes a
//! [`CancellationToken`](framework::CancellationToken). When one actor of a kind reaches the
//! terminal condition it fires its kind's signal, and peers blocked anywhere wake up
//! and exit without touching the counters.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic, domain-free primitives.
//! - **Key items**: [`BoundedQueue`](framework::BoundedQueue), [`Permits`](framework::Permits),
//!   [`CancellationToken`](framework::CancellationToken).
//!
//! ### 2. The Shared State ([`pipeline`])
//! Queues, counters, permits and the sequencing lock for one run.
//!
//! ### 3. The Actors ([`waiter_actor`], [`chef_actor`])
//! The two actor loops.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Spawns the actors, joins waiters then chefs, reports the result.
//! - **Key items**: [`Restaurant`](lifecycle::Restaurant), [`RunReport`](lifecycle::RunReport).
//!
//! ### 5. The Edges ([`config`], [`sink`], [`model`])
//! Settings file parsing, the order event log, and the plain data types.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Reads ./config.txt, appends to ./log.txt
//! cargo run
//!
//! # Explicit paths, with every order event traced
//! RUST_LOG=debug cargo run -- --config settings.txt --log run.log
//! ```

pub mod chef_actor;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod sink;
pub mod waiter_actor;
