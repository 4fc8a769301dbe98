//! # Ports
//!
//! Contracts between the data structures and the outside world.

pub mod outbound;

pub use outbound::ObjectStore;
