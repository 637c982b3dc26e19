//! Pure data structures shared by the actors and the event log.

pub mod order;

pub use order::*;
